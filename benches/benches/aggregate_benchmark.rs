//! Aggregation and cache benchmarks.
//!
//! Run with: `cargo bench --package coinbars-bench`

use coinbars_aggregate::{MultiIntervalAggregator, aggregate, aggregate_ticks};
use coinbars_bench::synthetic_ticks;
use coinbars_store::{DatasetCache, FileCache};
use coinbars_types::{Dataset, DatasetKey, Interval};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tempfile::TempDir;

const TICK_COUNTS: [usize; 3] = [10_000, 100_000, 1_000_000];

fn aggregate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for count in TICK_COUNTS {
        let ticks = synthetic_ticks(count, 700);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("minute", count), &ticks, |b, ticks| {
            b.iter(|| aggregate_ticks(black_box(ticks), Interval::Minute1));
        });

        group.bench_with_input(BenchmarkId::new("all_intervals", count), &ticks, |b, ticks| {
            b.iter(|| {
                let mut aggregator = MultiIntervalAggregator::all();
                for tick in black_box(ticks) {
                    aggregator.process_tick(tick);
                }
                aggregator.finish()
            });
        });

        let minutes = aggregate_ticks(&ticks, Interval::Minute1);
        group.bench_with_input(BenchmarkId::new("minute_to_daily", count), &minutes, |b, bars| {
            b.iter(|| aggregate(black_box(bars), Interval::Daily));
        });
    }

    group.finish();
}

fn cache_benchmark(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let cache = FileCache::new(temp_dir.path().to_path_buf()).unwrap();
    let key = DatasetKey::finest("benchUSD");

    let bars = aggregate_ticks(&synthetic_ticks(1_000_000, 700), Interval::Minute1);
    let dataset = Dataset::from_bars(bars).unwrap();

    let mut group = c.benchmark_group("file_cache");
    group.throughput(Throughput::Elements(dataset.len() as u64));
    group.bench_function("store", |b| {
        b.iter(|| cache.store(&key, black_box(&dataset), true).unwrap());
    });
    group.bench_function("fetch", |b| {
        b.iter(|| cache.fetch(&key).unwrap());
    });
    group.finish();
}

criterion_group!(benches, aggregate_benchmark, cache_benchmark);
criterion_main!(benches);
