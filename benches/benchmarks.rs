//! Benchmarks for interval-bnb: sequential engine vs the four-worker split.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use interval_bnb::{minimize, minimize_distributed, FunctionRegistry};

const CASES: [(&str, f64); 3] = [
    ("six_hump_camel", 1e-2),
    ("three_hump_camel", 1e-2),
    ("goldstein_price", 1e-2),
];

fn bench_modes(c: &mut Criterion) {
    let registry = FunctionRegistry::standard().expect("standard registry");
    let mut group = c.benchmark_group("minimize");
    group.sample_size(20);

    for (name, threshold) in CASES {
        let func = registry.get(name).expect("registered function");
        group.bench_with_input(BenchmarkId::new("sequential", name), &threshold, |b, &t| {
            b.iter(|| minimize(func.objective.as_ref(), &func.domain, black_box(t)))
        });
        group.bench_with_input(BenchmarkId::new("distributed", name), &threshold, |b, &t| {
            b.iter(|| minimize_distributed(&registry, name, black_box(t)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_modes);
criterion_main!(benches);
