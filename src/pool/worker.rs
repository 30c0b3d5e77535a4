//! Worker thread implementation

use crate::core::{BoxedTask, PoolError, Result, StartGate};
use crate::pool::thread_pool::SchedulePolicy;
use crate::queue::{PopError, PopMode, TaskQueue};
use log::{debug, error, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Statistics for a worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total number of tasks processed successfully
    pub tasks_processed: AtomicU64,
    /// Total number of tasks that returned an error
    pub tasks_failed: AtomicU64,
    /// Total number of tasks that panicked
    pub tasks_panicked: AtomicU64,
    /// Total number of tasks taken from a peer queue
    pub tasks_stolen: AtomicU64,
    /// Total time spent executing tasks (microseconds)
    pub total_processing_time_us: AtomicU64,
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment tasks processed counter
    pub fn increment_processed(&self) {
        self.tasks_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment tasks failed counter
    pub fn increment_failed(&self) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment tasks panicked counter
    pub fn increment_panicked(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment tasks stolen counter
    pub fn increment_stolen(&self) {
        self.tasks_stolen.fetch_add(1, Ordering::Relaxed);
    }

    /// Add processing time
    pub fn add_processing_time(&self, microseconds: u64) {
        self.total_processing_time_us
            .fetch_add(microseconds, Ordering::Relaxed);
    }

    /// Get total tasks processed
    pub fn get_tasks_processed(&self) -> u64 {
        self.tasks_processed.load(Ordering::Relaxed)
    }

    /// Get total tasks failed
    pub fn get_tasks_failed(&self) -> u64 {
        self.tasks_failed.load(Ordering::Relaxed)
    }

    /// Get total tasks panicked
    pub fn get_tasks_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }

    /// Get total tasks stolen from peer queues
    pub fn get_tasks_stolen(&self) -> u64 {
        self.tasks_stolen.load(Ordering::Relaxed)
    }

    /// Get average execution time per task in microseconds
    pub fn get_average_processing_time_us(&self) -> f64 {
        let total = self.total_processing_time_us.load(Ordering::Relaxed);
        let count = self.tasks_processed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }
}

/// A worker thread bound 1:1 to a task queue.
///
/// Worker `i` services queue `i`. Under [`SchedulePolicy::WorkStealing`] it
/// additionally probes peer queues when its own runs dry.
#[derive(Debug)]
pub struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread.
    ///
    /// The thread waits on `gate` before touching `queues`, so spawning may
    /// race with the rest of pool construction without the worker observing
    /// a partially built pool.
    ///
    /// # Shutdown Behavior
    ///
    /// Workers exit when their own queue is stopped and drained, ensuring
    /// all queued tasks are processed before shutdown completes.
    pub(crate) fn spawn(
        id: usize,
        queues: Arc<Vec<Arc<TaskQueue>>>,
        gate: Arc<StartGate>,
        policy: SchedulePolicy,
        name_prefix: &str,
    ) -> Result<Self> {
        let stats = Arc::new(WorkerStats::new());
        let stats_clone = Arc::clone(&stats);

        let thread = thread::Builder::new()
            .name(format!("{}-{}", name_prefix, id))
            .spawn(move || {
                gate.wait();
                match policy {
                    SchedulePolicy::Dedicated => Self::run_dedicated(id, &queues, &stats_clone),
                    SchedulePolicy::WorkStealing => Self::run_stealing(id, &queues, &stats_clone),
                }
            })
            .map_err(|e| PoolError::spawn_with_source(id, "thread creation failed", e))?;

        Ok(Self {
            id,
            thread: Some(thread),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Join the worker thread
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| PoolError::join(self.id, "Worker panicked"))?;
        }
        Ok(())
    }

    /// Dedicated loop: the worker only ever services its own queue.
    fn run_dedicated(id: usize, queues: &[Arc<TaskQueue>], stats: &WorkerStats) {
        debug!("worker {} started (dedicated)", id);
        let home = &queues[id];

        loop {
            match home.pop(PopMode::Blocking) {
                Ok(mut task) => Self::execute_task(id, &mut task, stats),
                // A blocking pop only fails once the queue is stopped and drained.
                Err(_) => break,
            }
        }

        debug!(
            "worker {} shutting down ({} processed, {} failed)",
            id,
            stats.get_tasks_processed(),
            stats.get_tasks_failed()
        );
    }

    /// Work-stealing loop: probe every queue starting at home, then park.
    ///
    /// Each round scans `home, home+1, ... (mod N)` with non-blocking pops,
    /// stopping at the first hit; the next round restarts at home, so a
    /// worker never drifts away from its own queue. Only when a full scan
    /// comes up empty does the worker block on its home queue.
    fn run_stealing(id: usize, queues: &[Arc<TaskQueue>], stats: &WorkerStats) {
        debug!("worker {} started (work-stealing)", id);
        let thread_number = queues.len();

        'next_task: loop {
            for offset in 0..thread_number {
                let index = (id + offset) % thread_number;
                match queues[index].pop(PopMode::NonBlocking) {
                    Ok(mut task) => {
                        if index != id {
                            stats.increment_stolen();
                        }
                        Self::execute_task(id, &mut task, stats);
                        continue 'next_task;
                    }
                    Err(PopError::Empty) | Err(PopError::Stopped) => continue,
                }
            }

            // Every queue came up empty; park on the home queue until work
            // arrives or it is stopped and drained.
            match queues[id].pop(PopMode::Blocking) {
                Ok(mut task) => Self::execute_task(id, &mut task, stats),
                Err(_) => break,
            }
        }

        debug!(
            "worker {} shutting down ({} processed, {} stolen)",
            id,
            stats.get_tasks_processed(),
            stats.get_tasks_stolen()
        );
    }

    /// Execute a single task with panic protection.
    ///
    /// A task that fails or panics is logged and counted; the worker thread
    /// always survives to process the next task.
    fn execute_task(id: usize, task: &mut BoxedTask, stats: &WorkerStats) {
        let start = std::time::Instant::now();

        let panic_result = catch_unwind(AssertUnwindSafe(|| task.execute()));

        let elapsed_us = start.elapsed().as_micros() as u64;

        match panic_result {
            Ok(Ok(())) => {
                stats.increment_processed();
            }
            Ok(Err(e)) => {
                warn!("worker {}: task '{}' failed: {}", id, task.task_type(), e);
                stats.increment_failed();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!("worker {}: task panicked: {}", id, panic_msg);
                stats.increment_panicked();
            }
        }

        stats.add_processing_time(elapsed_us);
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            // Use a timeout to prevent Drop from hanging indefinitely
            const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

            let start = std::time::Instant::now();
            loop {
                if thread.is_finished() {
                    // Thread finished, join to check for panics
                    if thread.join().is_err() {
                        error!("worker {} panicked during shutdown", self.id);
                    }
                    break;
                }

                if start.elapsed() >= JOIN_TIMEOUT {
                    warn!(
                        "worker {} did not finish within {}s timeout during drop, thread may be leaked",
                        self.id,
                        JOIN_TIMEOUT.as_secs()
                    );
                    break;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }
    }
}
