//! Thread pool implementation

use crate::core::{BoxedTask, ClosureTask, PoolError, Result, StartGate, Task};
use crate::pool::worker::{Worker, WorkerStats};
use crate::queue::TaskQueue;
use log::debug;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// How workers acquire tasks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulePolicy {
    /// Worker `i` only ever pops from queue `i`, blocking when it is empty.
    Dedicated,
    /// An idle worker first probes every queue (starting at its own index,
    /// wrapping) with non-blocking pops, and only blocks on its own queue
    /// once a full scan comes up empty. Trades an O(N) scan per steal
    /// attempt for better load balance when queues fill unevenly.
    #[default]
    WorkStealing,
}

/// Configuration for thread pool
#[derive(Clone, Debug)]
pub struct ThreadPoolConfig {
    /// Number of worker threads (0 = number of CPUs)
    pub num_threads: usize,
    /// Thread name prefix
    pub thread_name_prefix: String,
    /// Scheduling policy for workers.
    /// Default: [`SchedulePolicy::WorkStealing`]
    pub policy: SchedulePolicy,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            thread_name_prefix: "worker".to_string(),
            policy: SchedulePolicy::default(),
        }
    }
}

impl ThreadPoolConfig {
    /// Create a new configuration with specified number of threads
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: if num_threads == 0 {
                num_cpus::get()
            } else {
                num_threads
            },
            ..Default::default()
        }
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the scheduling policy
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_policy(mut self, policy: SchedulePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Configure workers to service only their own queues.
    ///
    /// This is a convenience method equivalent to:
    /// ```rust,ignore
    /// config.with_policy(SchedulePolicy::Dedicated)
    /// ```
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn dedicated(self) -> Self {
        self.with_policy(SchedulePolicy::Dedicated)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(PoolError::invalid_config(
                "num_threads",
                "Number of threads must be greater than 0",
            ));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(PoolError::invalid_config(
                "thread_name_prefix",
                "Thread name prefix must not be empty",
            ));
        }
        Ok(())
    }
}

/// A thread pool for executing tasks concurrently.
///
/// The pool owns one [`TaskQueue`] per worker (index `i`'s thread services
/// queue `i`) and places submissions round-robin across the queues.
///
/// # Shutdown Mechanism
///
/// Shutdown stops each queue and joins its worker, index by index. A
/// blocking pop keeps returning queued tasks until its queue is both
/// stopped and empty, so every task enqueued before shutdown is executed
/// before the owning worker exits.
///
/// # Ordering Guarantees
///
/// Tasks placed on the same queue execute in submission order. Across
/// queues there is no global order, and under work stealing a task may run
/// on a worker other than the one its queue is bound to.
pub struct ThreadPool {
    config: ThreadPoolConfig,
    workers: RwLock<Vec<Worker>>,
    /// Stats handles outlive the workers so totals stay readable after
    /// shutdown; repopulated on every (re)start.
    worker_stats: RwLock<Vec<Arc<WorkerStats>>>,
    queues: RwLock<Option<Arc<Vec<Arc<TaskQueue>>>>>,
    running: AtomicBool,
    /// Round-robin cursor. Shared by all submitters; the atomic increment
    /// keeps concurrent submissions race-free, and wrapping on overflow
    /// merely restarts the cycle.
    cursor: AtomicUsize,
    total_tasks_submitted: AtomicU64,
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("config", &self.config)
            .field("running", &self.running.load(Ordering::Relaxed))
            .field(
                "total_tasks_submitted",
                &self.total_tasks_submitted.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl ThreadPool {
    /// Create a new thread pool with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ThreadPoolConfig::default())
    }

    /// Create a thread pool with specified number of threads
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Self::with_config(ThreadPoolConfig::new(num_threads))
    }

    /// Create a thread pool with custom configuration
    pub fn with_config(config: ThreadPoolConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            workers: RwLock::new(Vec::new()),
            worker_stats: RwLock::new(Vec::new()),
            queues: RwLock::new(None),
            running: AtomicBool::new(false),
            cursor: AtomicUsize::new(0),
            total_tasks_submitted: AtomicU64::new(0),
        })
    }

    /// Start the thread pool.
    ///
    /// Allocates one fresh queue per worker and spawns the worker threads.
    /// The workers hold on a start gate until every spawn has succeeded, so
    /// no worker observes a partially constructed pool.
    ///
    /// # Restart Support
    ///
    /// The pool can be restarted after shutdown by calling start() again.
    /// Workers will be recreated with new queues.
    ///
    /// # Thread Safety
    ///
    /// This method uses interior mutability and can be called from `&self`.
    /// Multiple concurrent calls are safe - only the first will succeed,
    /// others will receive an `AlreadyRunning` error.
    pub fn start(&self) -> Result<()> {
        // Atomically check and set running flag to prevent race condition
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PoolError::already_running(
                &self.config.thread_name_prefix,
                self.config.num_threads,
            ));
        }

        let queues: Arc<Vec<Arc<TaskQueue>>> = Arc::new(
            (0..self.config.num_threads)
                .map(|_| Arc::new(TaskQueue::new()))
                .collect(),
        );
        let gate = Arc::new(StartGate::new());

        let mut workers = Vec::with_capacity(self.config.num_threads);
        for id in 0..self.config.num_threads {
            match Worker::spawn(
                id,
                Arc::clone(&queues),
                Arc::clone(&gate),
                self.config.policy,
                &self.config.thread_name_prefix,
            ) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    // Fail fast: release the workers spawned so far, then
                    // report the construction failure.
                    for queue in queues.iter() {
                        queue.stop();
                    }
                    gate.open();
                    for worker in workers {
                        let _ = worker.join();
                    }
                    self.running.store(false, Ordering::Release);
                    return Err(e);
                }
            }
        }

        *self.worker_stats.write() = workers.iter().map(|w| w.stats()).collect();
        *self.workers.write() = workers;
        *self.queues.write() = Some(Arc::clone(&queues));
        self.cursor.store(0, Ordering::Relaxed);

        // Every spawn succeeded; let the workers loose.
        gate.open();

        debug!(
            "thread pool '{}' started with {} workers ({:?})",
            self.config.thread_name_prefix, self.config.num_threads, self.config.policy
        );
        Ok(())
    }

    /// Submit a task to the pool.
    ///
    /// The target queue is chosen round-robin: successive submissions cycle
    /// through queue indices `0, 1, ..., N-1, 0, 1, ...`. Submission never
    /// waits for execution; it returns as soon as the task is enqueued.
    pub fn submit<T: Task + 'static>(&self, task: T) -> Result<()> {
        self.submit_boxed(Box::new(task))
    }

    /// Internal method to place a boxed task on the next queue
    fn submit_boxed(&self, task: BoxedTask) -> Result<()> {
        if !self.running.load(Ordering::Acquire) {
            return Err(PoolError::not_running(&self.config.thread_name_prefix));
        }

        let queues_guard = self.queues.read();
        let queues = queues_guard
            .as_ref()
            .ok_or_else(|| PoolError::not_running(&self.config.thread_name_prefix))?;

        let next = self.cursor.fetch_add(1, Ordering::Relaxed) % queues.len();
        queues[next].push(task);

        self.total_tasks_submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Submit a closure as a task
    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.submit(ClosureTask::new(f))
    }

    /// Get the number of worker threads
    pub fn num_threads(&self) -> usize {
        self.config.num_threads
    }

    /// Check if the pool is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Get total number of tasks submitted
    pub fn total_tasks_submitted(&self) -> u64 {
        self.total_tasks_submitted.load(Ordering::Relaxed)
    }

    /// Get the current number of pending tasks per queue.
    ///
    /// The values are approximate as workers may pop tasks between checking
    /// and using them. Returns an empty vector when the pool is not running.
    pub fn queue_sizes(&self) -> Vec<usize> {
        self.queues
            .read()
            .as_ref()
            .map(|queues| queues.iter().map(|q| q.len()).collect())
            .unwrap_or_default()
    }

    /// Get statistics for all workers.
    ///
    /// The handles remain valid after shutdown, so final counts can be read
    /// once all workers have been joined; a restart replaces them.
    pub fn worker_stats(&self) -> Vec<Arc<WorkerStats>> {
        self.worker_stats.read().clone()
    }

    /// Get total tasks processed across all workers
    pub fn total_tasks_processed(&self) -> u64 {
        let stats = self.worker_stats.read();
        stats.iter().map(|s| s.get_tasks_processed()).sum()
    }

    /// Get total tasks failed across all workers
    pub fn total_tasks_failed(&self) -> u64 {
        let stats = self.worker_stats.read();
        stats.iter().map(|s| s.get_tasks_failed()).sum()
    }

    /// Get total tasks panicked across all workers
    pub fn total_tasks_panicked(&self) -> u64 {
        let stats = self.worker_stats.read();
        stats.iter().map(|s| s.get_tasks_panicked()).sum()
    }

    /// Get total tasks stolen from peer queues across all workers
    pub fn total_tasks_stolen(&self) -> u64 {
        let stats = self.worker_stats.read();
        stats.iter().map(|s| s.get_tasks_stolen()).sum()
    }

    /// Shutdown the thread pool and wait for all workers to finish.
    ///
    /// # Graceful Shutdown
    ///
    /// 1. Stops accepting new submissions (clears the running flag)
    /// 2. For each index in order: stops that queue, then joins its worker
    ///
    /// A worker's blocking pop keeps returning queued tasks until its queue
    /// is stopped and empty, so every task enqueued before shutdown runs to
    /// completion before this method returns. The join must come after the
    /// stop for every index, or the call would wait forever on a worker
    /// parked on its own queue.
    ///
    /// # Thread Safety
    ///
    /// This method uses interior mutability and can be called from `&self`.
    /// Multiple concurrent calls are safe - only the first will perform the
    /// shutdown, others will return immediately.
    pub fn shutdown(&self) -> Result<()> {
        if self
            .running
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }

        let queues = self.queues.write().take();
        let workers = std::mem::take(&mut *self.workers.write());

        if let Some(queues) = queues {
            for (queue, worker) in queues.iter().zip(workers) {
                queue.stop();
                worker.join()?;
            }
        }

        debug!("thread pool '{}' shut down", self.config.thread_name_prefix);
        Ok(())
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Only attempt shutdown if still running to avoid redundant work
        if self.running.load(Ordering::Acquire) {
            if let Err(e) = self.shutdown() {
                log::error!(
                    "failed to shutdown thread pool '{}' during drop: {}",
                    self.config.thread_name_prefix,
                    e
                );
            }
        }
    }
}
