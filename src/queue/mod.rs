//! Per-worker task queues.
//!
//! Each worker thread owns one [`TaskQueue`]: a FIFO of boxed tasks guarded
//! by its own mutex, with a condition variable for blocking consumers and an
//! explicit stop flag. Queues never share a lock, so the work-stealing scan
//! contends only with the single queue it is currently probing.
//!
//! # Pop semantics
//!
//! ```rust
//! use stealpool::queue::{PopError, PopMode, TaskQueue};
//! use stealpool::core::ClosureTask;
//!
//! let queue = TaskQueue::new();
//! queue.push(Box::new(ClosureTask::new(|| Ok(()))));
//!
//! // A queued task is returned regardless of mode.
//! assert!(queue.pop(PopMode::NonBlocking).is_ok());
//!
//! // Empty + non-blocking fails immediately.
//! assert_eq!(queue.pop(PopMode::NonBlocking).unwrap_err(), PopError::Empty);
//!
//! // Empty + stopped tells the consumer to exit.
//! queue.stop();
//! assert_eq!(queue.pop(PopMode::Blocking).unwrap_err(), PopError::Stopped);
//! ```

mod fifo;

pub use fifo::TaskQueue;

use std::fmt;

/// How a [`TaskQueue::pop`] call behaves when the queue is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopMode {
    /// Wait on the queue's condition variable until a task arrives or the
    /// queue is stopped and drained.
    Blocking,
    /// Return immediately with [`PopError::Empty`] instead of waiting.
    NonBlocking,
}

/// Why a pop returned no task.
///
/// This is a control-flow signal for consumers, not an exceptional
/// condition: workers use [`Stopped`](PopError::Stopped) to detect shutdown
/// and the stealing scan treats [`Empty`](PopError::Empty) as "probe the
/// next queue".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopError {
    /// The queue held no task at the time of the call (non-blocking only)
    Empty,
    /// The queue is stopped and fully drained; the consumer should exit
    Stopped,
}

impl fmt::Display for PopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopError::Empty => write!(f, "queue is empty"),
            PopError::Stopped => write!(f, "queue is stopped and drained"),
        }
    }
}

impl std::error::Error for PopError {}

/// Result type for pop operations.
pub type PopResult = std::result::Result<crate::core::BoxedTask, PopError>;
