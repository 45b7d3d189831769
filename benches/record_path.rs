use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

use kuba_stats::view::{
    Aggregation, AggregationWindow, BucketBoundaries, ViewData, ViewDescriptor,
};

fn row_keys(cardinality: usize) -> Vec<Vec<String>> {
    (0..cardinality)
        .map(|i| vec![format!("host-{}", i % 16), format!("method-{}", i)])
        .collect()
}

fn bench_cumulative_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("cumulative_sum_add");

    for cardinality in [1, 16, 256] {
        let keys = row_keys(cardinality);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(cardinality),
            &cardinality,
            |b, _| {
                let descriptor = ViewDescriptor::new().with_aggregation(Aggregation::Sum);
                let mut data = ViewData::new(0, &descriptor);
                let mut now = 0;
                let mut i = 0;
                b.iter(|| {
                    now += 1;
                    i = (i + 1) % keys.len();
                    data.add(black_box(1.5), &keys[i], now);
                });
            },
        );
    }

    group.finish();
}

fn bench_interval_distribution(c: &mut Criterion) {
    let mut group = c.benchmark_group("interval_distribution");
    let boundaries = BucketBoundaries::linear(16, 0.0, 10.0);
    let keys = row_keys(64);

    group.bench_function("add", |b| {
        let descriptor = ViewDescriptor::new()
            .with_aggregation(Aggregation::Distribution(boundaries.clone()))
            .with_aggregation_window(AggregationWindow::Interval(Duration::from_secs(60)));
        let mut data = ViewData::new(0, &descriptor);
        let mut now = 0;
        let mut i = 0;
        b.iter(|| {
            now += 7;
            i = (i + 1) % keys.len();
            data.add(black_box((i % 160) as f64), &keys[i], now);
        });
    });

    group.bench_function("snapshot", |b| {
        let descriptor = ViewDescriptor::new()
            .with_aggregation(Aggregation::Distribution(boundaries.clone()))
            .with_aggregation_window(AggregationWindow::Interval(Duration::from_secs(60)));
        let mut data = ViewData::new(0, &descriptor);
        for (i, key) in keys.iter().enumerate() {
            for j in 0..32 {
                data.add((i * j % 160) as f64, key, (i * 100 + j) as i64);
            }
        }
        b.iter(|| black_box(data.snapshot(black_box(30_000)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_cumulative_sum, bench_interval_distribution);
criterion_main!(benches);
