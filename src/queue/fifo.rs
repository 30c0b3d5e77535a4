//! Mutex + condition-variable FIFO queue, one instance per worker.

use super::{PopError, PopMode, PopResult};
use crate::core::BoxedTask;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Queue state guarded by the mutex: the task sequence and the stop flag
/// transition together, so they live under one lock.
struct QueueState {
    tasks: VecDeque<BoxedTask>,
    stopped: bool,
}

/// A FIFO task queue for a single worker.
///
/// Insertion order is execution order within one queue. The stop flag is
/// one-way: once set it never reverts, and a stopped queue that has also
/// been drained refuses to block further pop calls. Pushes always succeed,
/// even after [`stop()`](Self::stop) - a stopped queue still accepts tasks
/// structurally, although no worker may be listening anymore.
pub struct TaskQueue {
    state: Mutex<QueueState>,
    condvar: Condvar,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    /// Create a new, empty queue
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                stopped: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Append a task at the tail and wake one waiting consumer.
    ///
    /// Never blocks the caller beyond the lock hold time and has no failure
    /// condition.
    pub fn push(&self, task: BoxedTask) {
        {
            let mut state = self.state.lock();
            state.tasks.push_back(task);
        }
        self.condvar.notify_one();
    }

    /// Remove and return the head task.
    ///
    /// Pending tasks are always drained before the queue reports
    /// [`PopError::Stopped`], even if the stop flag is already set. A
    /// blocking pop re-checks the queue after every wakeup, so spurious
    /// wakeups never produce a spurious failure.
    pub fn pop(&self, mode: PopMode) -> PopResult {
        let mut state = self.state.lock();
        loop {
            if let Some(task) = state.tasks.pop_front() {
                return Ok(task);
            }
            if state.stopped {
                return Err(PopError::Stopped);
            }
            match mode {
                PopMode::Blocking => self.condvar.wait(&mut state),
                PopMode::NonBlocking => return Err(PopError::Empty),
            }
        }
    }

    /// Set the stop flag and wake all waiting consumers. Idempotent.
    pub fn stop(&self) {
        {
            let mut state = self.state.lock();
            state.stopped = true;
        }
        self.condvar.notify_all();
    }

    /// Check whether the queue has been stopped
    pub fn is_stopped(&self) -> bool {
        self.state.lock().stopped
    }

    /// Current number of queued tasks
    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Returns `true` if no tasks are queued
    pub fn is_empty(&self) -> bool {
        self.state.lock().tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClosureTask;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn counting_task(counter: &Arc<AtomicUsize>, value: usize) -> BoxedTask {
        let counter = Arc::clone(counter);
        Box::new(ClosureTask::new(move || {
            counter.store(value, Ordering::SeqCst);
            Ok(())
        }))
    }

    #[test]
    fn test_push_pop_fifo_order() {
        let queue = TaskQueue::new();
        let observed = Arc::new(AtomicUsize::new(0));

        for value in 1..=3 {
            queue.push(counting_task(&observed, value));
        }
        assert_eq!(queue.len(), 3);

        for expected in 1..=3 {
            let mut task = queue.pop(PopMode::NonBlocking).expect("task queued");
            task.execute().unwrap();
            assert_eq!(observed.load(Ordering::SeqCst), expected);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_nonblocking_pop_empty() {
        let queue = TaskQueue::new();
        assert_eq!(queue.pop(PopMode::NonBlocking).unwrap_err(), PopError::Empty);
    }

    #[test]
    fn test_stop_is_one_way_and_idempotent() {
        let queue = TaskQueue::new();
        assert!(!queue.is_stopped());
        queue.stop();
        queue.stop();
        assert!(queue.is_stopped());
        assert_eq!(
            queue.pop(PopMode::Blocking).unwrap_err(),
            PopError::Stopped
        );
    }

    #[test]
    fn test_pending_tasks_drain_before_stopped() {
        let queue = TaskQueue::new();
        let observed = Arc::new(AtomicUsize::new(0));
        queue.push(counting_task(&observed, 7));
        queue.stop();

        // Stopped but non-empty: the task still comes out first.
        assert!(queue.pop(PopMode::Blocking).is_ok());
        assert_eq!(queue.pop(PopMode::Blocking).unwrap_err(), PopError::Stopped);
        assert_eq!(
            queue.pop(PopMode::NonBlocking).unwrap_err(),
            PopError::Stopped
        );
    }

    #[test]
    fn test_push_after_stop_still_accepted() {
        let queue = TaskQueue::new();
        queue.stop();
        queue.push(counting_task(&Arc::new(AtomicUsize::new(0)), 1));
        assert_eq!(queue.len(), 1);
        assert!(queue.pop(PopMode::NonBlocking).is_ok());
    }

    #[test]
    fn test_stop_wakes_blocked_consumer() {
        let queue = Arc::new(TaskQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop(PopMode::Blocking))
        };

        // Let the consumer park on the condition variable first.
        thread::sleep(Duration::from_millis(50));
        queue.stop();

        let result = consumer.join().expect("consumer panicked");
        assert_eq!(result.unwrap_err(), PopError::Stopped);
    }

    #[test]
    fn test_push_wakes_blocked_consumer() {
        let queue = Arc::new(TaskQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop(PopMode::Blocking).is_ok())
        };

        thread::sleep(Duration::from_millis(50));
        queue.push(counting_task(&Arc::new(AtomicUsize::new(0)), 1));

        assert!(consumer.join().expect("consumer panicked"));
    }

    #[test]
    fn test_concurrent_producers() {
        let queue = Arc::new(TaskQueue::new());
        let mut handles = vec![];

        for _ in 0..4 {
            let queue = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    queue.push(Box::new(ClosureTask::new(|| Ok(()))));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("producer panicked");
        }

        assert_eq!(queue.len(), 400);
        let mut drained = 0;
        while queue.pop(PopMode::NonBlocking).is_ok() {
            drained += 1;
        }
        assert_eq!(drained, 400);
    }
}
