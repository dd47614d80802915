//! Benchmarking IONEX parsing & full day predictions
extern crate criterion;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ionfr::prelude::{predict, Config, Ionex, ObservationRequest};

const IONEX: &str = "test_resources/IONEX/V1/REGG2930.11I";

fn benchmark(c: &mut Criterion) {
    let mut parsing_grp = c.benchmark_group("parsing");

    // Regional 2-hourly IONEX (V1)
    parsing_grp.bench_function("IONEX/V1", |b| {
        b.iter(|| {
            let _ = Ionex::from_file(black_box(IONEX)).unwrap();
        })
    });

    parsing_grp.finish();

    let ionex = Ionex::from_file(IONEX).unwrap();
    let cfg = Config::default();

    let request = ObservationRequest::from_descriptions(
        "08h13m36.0s+48d13m03s",
        "52d54m54.6sn",
        "6d52m11.7se",
        "2011-10-20T00:00:00",
    )
    .unwrap();

    let mut pipeline_grp = c.benchmark_group("pipeline");

    // 24 visible hours
    pipeline_grp.bench_function("full day", |b| {
        b.iter(|| {
            let _ = predict(black_box(request), &ionex, &cfg).unwrap();
        })
    });

    pipeline_grp.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
