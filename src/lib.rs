//! # stealpool
//!
//! A fixed-size worker thread pool with per-worker queues, round-robin task
//! placement, and work stealing.
//!
//! ## Features
//!
//! - **Per-worker queues**: each worker owns a private FIFO guarded by its
//!   own mutex and condition variable, so queues never contend with each other
//! - **Round-robin placement**: submissions cycle across queue indices,
//!   race-free under concurrent submitters
//! - **Work stealing**: an idle worker probes peer queues before parking on
//!   its own, keeping workers busy when load is uneven
//! - **Graceful shutdown**: queues are stopped and workers joined in index
//!   order; every task enqueued before shutdown still runs
//! - **Failure isolation**: a task that errors or panics is logged and
//!   counted, and the worker thread survives
//!
//! ## Quick Start
//!
//! ```rust
//! use stealpool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // Create and start a thread pool
//! let pool = ThreadPool::with_threads(4)?;
//! pool.start()?;
//!
//! // Submit tasks
//! for i in 0..10 {
//!     pool.execute(move || {
//!         println!("Task {} executing", i);
//!         Ok(())
//!     })?;
//! }
//!
//! // Shutdown gracefully; queued tasks drain first
//! pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Scheduling Policy
//!
//! ```rust
//! use stealpool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // Workers service only their own queues (no stealing)
//! let config = ThreadPoolConfig::new(8)
//!     .dedicated()
//!     .with_thread_name_prefix("my-worker");
//!
//! let pool = ThreadPool::with_config(config)?;
//! pool.start()?;
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Tasks
//!
//! ```rust
//! use stealpool::prelude::*;
//!
//! struct MyTask {
//!     data: String,
//! }
//!
//! impl Task for MyTask {
//!     fn execute(&mut self) -> Result<()> {
//!         println!("Processing: {}", self.data);
//!         Ok(())
//!     }
//!
//!     fn task_type(&self) -> &str {
//!         "MyTask"
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! # let pool = ThreadPool::with_threads(2)?;
//! # pool.start()?;
//! pool.submit(MyTask {
//!     data: "test".to_string(),
//! })?;
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Collecting Results
//!
//! The pool itself returns nothing from tasks; share a [`Collector`] with
//! the tasks that produce values:
//!
//! ```rust
//! use stealpool::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::with_threads(2)?;
//! pool.start()?;
//!
//! let results = Arc::new(Collector::new());
//! for i in 0..10u64 {
//!     let results = Arc::clone(&results);
//!     pool.execute(move || {
//!         results.push(i * 2);
//!         Ok(())
//!     })?;
//! }
//!
//! pool.shutdown()?;
//! assert_eq!(results.len(), 10);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
pub mod sink;

pub use crate::core::{BoxedTask, ClosureTask, PoolError, Result, Task};
pub use crate::pool::{SchedulePolicy, ThreadPool, ThreadPoolConfig, WorkerStats};
pub use crate::sink::Collector;
