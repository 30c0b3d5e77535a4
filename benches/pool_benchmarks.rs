use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use stealpool::prelude::*;

fn started_pool(config: ThreadPoolConfig) -> ThreadPool {
    let pool = ThreadPool::with_config(config).expect("Failed to create pool");
    pool.start().expect("Failed to start pool");
    pool
}

fn benchmark_pool_lifecycle(c: &mut Criterion) {
    c.bench_function("pool_lifecycle", |b| {
        b.iter(|| {
            let pool = started_pool(ThreadPoolConfig::new(4));
            pool.shutdown().expect("Failed to shutdown pool");
        });
    });
}

fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for (name, policy) in [
        ("work_stealing", SchedulePolicy::WorkStealing),
        ("dedicated", SchedulePolicy::Dedicated),
    ] {
        group.bench_function(format!("trivial_tasks_1000_{}", name), |b| {
            b.iter_batched(
                || started_pool(ThreadPoolConfig::new(4).with_policy(policy)),
                |pool| {
                    for _ in 0..1000 {
                        pool.execute(|| {
                            black_box(1 + 1);
                            Ok(())
                        })
                        .expect("Failed to submit task");
                    }
                    pool.shutdown().expect("Failed to shutdown pool");
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_imbalanced_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("imbalanced_load");

    // Every fourth task is expensive; round robin alone leaves the other
    // queues idle while one backs up, which is where stealing pays off.
    for (name, policy) in [
        ("work_stealing", SchedulePolicy::WorkStealing),
        ("dedicated", SchedulePolicy::Dedicated),
    ] {
        group.bench_function(format!("skewed_tasks_400_{}", name), |b| {
            b.iter_batched(
                || started_pool(ThreadPoolConfig::new(4).with_policy(policy)),
                |pool| {
                    for i in 0..400u64 {
                        pool.execute(move || {
                            let iterations = if i % 4 == 0 { 20_000 } else { 100 };
                            let mut sum = 0u64;
                            for j in 0..iterations {
                                sum = sum.wrapping_add(j);
                            }
                            black_box(sum);
                            Ok(())
                        })
                        .expect("Failed to submit task");
                    }
                    pool.shutdown().expect("Failed to shutdown pool");
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_pool_lifecycle,
    benchmark_dispatch,
    benchmark_imbalanced_load
);
criterion_main!(benches);
