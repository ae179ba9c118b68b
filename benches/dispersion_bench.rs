use comparable_dispersion::scoring::{score, ComparableRecord, DispersionConfig};
use std::hint::black_box;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn synthetic_comparables(count: usize) -> Vec<ComparableRecord> {
    (0..count)
        .map(|i| {
            let size = 40.0 + (i % 30) as f64;
            let ppu = 9_000.0 + ((i * 37) % 2_000) as f64;
            let similarity = 0.3 + ((i * 13) % 70) as f64 / 100.0;
            ComparableRecord::new(ppu * size, size, similarity)
        })
        .collect()
}

fn bench_score(c: &mut Criterion) {
    let config = DispersionConfig::default();
    let mut group = c.benchmark_group("dispersion_score");

    // Report pipelines pass 1-50 comparables; larger sizes check linear scaling
    for size in [5usize, 50, 1_000].iter() {
        let comps = synthetic_comparables(*size);
        group.bench_with_input(BenchmarkId::new("comparables", size), &comps, |b, comps| {
            b.iter(|| score(black_box(comps), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
