//! Waterfall and series benchmarks

use criterion::{BenchmarkId, Criterion};
use flowx::{Done, TaskList};
use futures::executor::block_on;

fn incrementing_chain(length: usize) -> TaskList<u64> {
    let mut list = TaskList::with_capacity(length);
    for _ in 0..length {
        list.add(|done: Done<u64>, inputs: Vec<u64>| async move {
            done.ok(inputs.into_iter().map(|v| v + 1));
        });
    }
    list
}

pub fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("waterfall_chain");
    for length in [10usize, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            b.iter(|| {
                let values = block_on(incrementing_chain(length).run_waterfall(vec![0])).unwrap();
                assert_eq!(values, vec![length as u64]);
            });
        });
    }
    group.finish();

    let mut group = c.benchmark_group("series_chain");
    for length in [10usize, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            b.iter(|| block_on(incrementing_chain(length).run_series()).unwrap());
        });
    }
    group.finish();
}
