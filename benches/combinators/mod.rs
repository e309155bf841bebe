//! Map and filter benchmarks

use criterion::{BenchmarkId, Criterion};
use flowx::{filter, map, map_parallel, Done};
use futures::executor::block_on;

pub fn bench_combinators(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("map");
    for size in [10u32, 100, 1_000] {
        group.bench_with_input(BenchmarkId::new("ordered", size), &size, |b, &size| {
            b.iter(|| {
                block_on(map(0..size, |done: Done<u32>, v: u32, _| async move {
                    done.ok([v * 2])
                }))
                .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &size, |b, &size| {
            b.iter(|| {
                rt.block_on(map_parallel(
                    0..size,
                    |done: Done<u32>, v: u32, _| async move { done.ok([v * 2]) },
                    |fut| {
                        tokio::spawn(fut);
                    },
                ))
                .unwrap()
            });
        });
    }
    group.finish();

    c.bench_function("filter_ordered_1000", |b| {
        b.iter(|| {
            block_on(filter(0..1_000u32, |done: Done<bool>, v: u32, _| async move {
                done.ok([v % 3 == 0])
            }))
            .unwrap()
        });
    });
}
