//! Convenient re-exports for common types and traits

pub use crate::core::{BoxedTask, ClosureTask, PoolError, Result, Task};
pub use crate::pool::{SchedulePolicy, ThreadPool, ThreadPoolConfig, WorkerStats};
pub use crate::sink::Collector;
