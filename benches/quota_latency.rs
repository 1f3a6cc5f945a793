use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use event_aggregator_hub::bench_support::{QuotaBenchFixture, StoreKind};

fn bench_quota_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("daily_quota");
    group
        .sample_size(500)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
        .sampling_mode(SamplingMode::Auto);

    for (label, kind) in [("memory", StoreKind::Memory), ("sqlite", StoreKind::Sqlite)] {
        let fixture = QuotaBenchFixture::new(kind, u64::MAX).with_origins(8, 0);
        let quota = fixture.aggregator.quota().clone();

        group.bench_function(BenchmarkId::new("remaining", label), |b| {
            b.iter(|| black_box(quota.remaining()));
        });

        group.bench_function(BenchmarkId::new("reduce", label), |b| {
            b.iter(|| black_box(quota.reduce(black_box(1))));
        });

        group.bench_function(BenchmarkId::new("try_reduce", label), |b| {
            b.iter(|| black_box(quota.try_reduce(black_box("2")).expect("numeric amount")));
        });
    }

    let fixture = QuotaBenchFixture::new(StoreKind::Memory, 100).with_origins(64, 500);
    let quota = fixture.aggregator.quota().clone();
    group.bench_function("ceiling_with_cached_origins", |b| {
        b.iter(|| black_box(quota.ceiling()));
    });

    group.finish();
}

criterion_group!(quota_latency, bench_quota_operations);
criterion_main!(quota_latency);
