//! Thread-safe result collection.
//!
//! The pool moves no data back to submitters: tasks that produce values
//! share a [`Collector`] (usually behind an `Arc`) and append into it. This
//! keeps result aggregation an explicit collaborator of the tasks instead
//! of ambient global state.

use parking_lot::Mutex;

/// An append-only, thread-safe collector for values produced by tasks.
///
/// # Example
///
/// ```rust
/// use stealpool::prelude::*;
/// use std::sync::Arc;
///
/// # fn main() -> Result<()> {
/// let pool = ThreadPool::with_threads(2)?;
/// pool.start()?;
///
/// let results = Arc::new(Collector::new());
/// for i in 0..4u32 {
///     let results = Arc::clone(&results);
///     pool.execute(move || {
///         results.push(i * i);
///         Ok(())
///     })?;
/// }
///
/// pool.shutdown()?;
/// assert_eq!(results.len(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Collector<T> {
    values: Mutex<Vec<T>>,
}

impl<T> Collector<T> {
    /// Create a new, empty collector
    pub fn new() -> Self {
        Self {
            values: Mutex::new(Vec::new()),
        }
    }

    /// Append a value
    pub fn push(&self, value: T) {
        self.values.lock().push(value);
    }

    /// Number of collected values
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Returns `true` if nothing has been collected
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }

    /// Consume the collector and return the collected values in append order
    pub fn into_inner(self) -> Vec<T> {
        self.values.into_inner()
    }
}

impl<T: Clone> Collector<T> {
    /// Clone the collected values in append order
    pub fn snapshot(&self) -> Vec<T> {
        self.values.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_push_and_snapshot() {
        let collector = Collector::new();
        assert!(collector.is_empty());

        collector.push(1);
        collector.push(2);
        collector.push(3);

        assert_eq!(collector.len(), 3);
        assert_eq!(collector.snapshot(), vec![1, 2, 3]);
        assert_eq!(collector.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn test_concurrent_pushes_lose_nothing() {
        let collector = Arc::new(Collector::new());
        let mut handles = vec![];

        for producer in 0..4 {
            let collector = Arc::clone(&collector);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    collector.push(producer * 100 + i);
                }
            }));
        }
        for handle in handles {
            handle.join().expect("producer panicked");
        }

        let mut values = collector.snapshot();
        values.sort_unstable();
        assert_eq!(values, (0..400).collect::<Vec<_>>());
    }
}
