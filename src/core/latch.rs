//! One-shot start gate for worker startup coordination.
//!
//! Worker threads are spawned one by one while the pool is still assembling
//! its own state. Each worker waits on a [`StartGate`] before touching any
//! pool-owned collection; the pool opens the gate only once every spawn has
//! succeeded. The wait blocks on a condition variable instead of spinning.

use parking_lot::{Condvar, Mutex};

/// A one-shot gate that blocks waiters until it is opened.
///
/// Opening is permanent: once open, all current waiters are woken and every
/// later [`wait()`](Self::wait) returns immediately. Opening twice is a no-op.
#[derive(Debug, Default)]
pub struct StartGate {
    opened: Mutex<bool>,
    condvar: Condvar,
}

impl StartGate {
    /// Create a new, closed gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Block the calling thread until the gate is opened
    pub fn wait(&self) {
        let mut opened = self.opened.lock();
        while !*opened {
            self.condvar.wait(&mut opened);
        }
    }

    /// Open the gate and wake all waiters
    pub fn open(&self) {
        let mut opened = self.opened.lock();
        *opened = true;
        self.condvar.notify_all();
    }

    /// Check whether the gate has been opened
    pub fn is_open(&self) -> bool {
        *self.opened.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_gate_starts_closed() {
        let gate = StartGate::new();
        assert!(!gate.is_open());
        gate.open();
        assert!(gate.is_open());
    }

    #[test]
    fn test_open_is_idempotent() {
        let gate = StartGate::new();
        gate.open();
        gate.open();
        assert!(gate.is_open());
        // Waiting on an open gate must not block
        gate.wait();
    }

    #[test]
    fn test_wait_releases_all_waiters() {
        let gate = Arc::new(StartGate::new());
        let mut handles = vec![];

        for _ in 0..4 {
            let gate = Arc::clone(&gate);
            handles.push(thread::spawn(move || {
                gate.wait();
            }));
        }

        // Give the waiters a moment to park before opening
        thread::sleep(Duration::from_millis(50));
        gate.open();

        for handle in handles {
            handle.join().expect("waiter panicked");
        }
    }
}
