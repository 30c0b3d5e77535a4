//! Fibonacci fan-out demo
//!
//! Submits 40 recursive Fibonacci computations to the pool and collects the
//! results through a shared `Collector`.
//!
//! Run with: cargo run --example fibonacci

use stealpool::prelude::*;
use std::sync::Arc;

fn fib(n: u64) -> u64 {
    if n < 2 {
        n
    } else {
        fib(n - 1) + fib(n - 2)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let pool = ThreadPool::new()?;
    pool.start()?;

    println!(
        "Computing fib(0..40) on {} workers (work-stealing)\n",
        pool.num_threads()
    );

    let results = Arc::new(Collector::new());
    for n in 0..40u64 {
        let results = Arc::clone(&results);
        pool.execute(move || {
            results.push((n, fib(n)));
            Ok(())
        })?;
    }

    // Shutdown drains every queued computation before returning.
    pool.shutdown()?;

    let mut values = results.snapshot();
    values.sort_unstable();
    for (n, value) in &values {
        println!("fib({}) = {}", n, value);
    }

    println!("\nPer-worker statistics:");
    for (i, stats) in pool.worker_stats().iter().enumerate() {
        println!(
            "  worker {}: {} processed, {} stolen, avg time: {:.2}us",
            i,
            stats.get_tasks_processed(),
            stats.get_tasks_stolen(),
            stats.get_average_processing_time_us()
        );
    }

    Ok(())
}
