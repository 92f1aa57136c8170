//! Benchmark for a full evaluation over the built-in catalog.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use soil_scorer::{RawValueEntry, SoilHealthEngine, SoilProperties};

fn fixture() -> SoilProperties {
    let values = [
        ("ph", 5.2, 0.3),
        ("carbon_organic", 1.2, 0.2),
        ("nitrogen_total", 0.12, 0.02),
        ("phosphorous_extractable", 25.0, 4.0),
        ("potassium_extractable", 60.0, 12.0),
    ];

    values
        .iter()
        .map(|(name, value, standard_error)| {
            (
                name.to_string(),
                [RawValueEntry::with_standard_error(*value, *standard_error)]
                    .into_iter()
                    .collect(),
            )
        })
        .collect()
}

fn bench_evaluate(c: &mut Criterion) {
    let engine = SoilHealthEngine::default();
    let measurements = fixture();

    c.bench_function("evaluate_five_properties", |b| {
        b.iter(|| engine.evaluate(black_box(&measurements)))
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
