//! Core types and traits for the pool

pub mod error;
pub mod latch;
pub mod task;

pub use error::{PoolError, Result};
pub use latch::StartGate;
pub use task::{BoxedTask, ClosureTask, Task};
