//! Benchmarks for cell histogram computation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hog_cells::hog::{cell_histograms, HogOptions};
use hog_cells::utils::bench_gradients;
use hog_cells::GradientField;

fn bench_gradient_field(c: &mut Criterion) {
    let (rows, columns) = bench_gradients(480, 640);
    c.bench_function("gradient_field_480x640", |b| {
        b.iter(|| GradientField::from_gradients(black_box(&rows), black_box(&columns)))
    });
}

fn bench_cell_histograms(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_histograms");
    let (rows, columns) = bench_gradients(480, 640);

    for cell in [4usize, 8, 16] {
        let options = HogOptions::covering(480, 640, cell, cell, 9);
        group.bench_with_input(BenchmarkId::new("sequential", cell), &options, |b, &options| {
            b.iter(|| cell_histograms(black_box(&rows), black_box(&columns), options))
        });

        #[cfg(feature = "rayon")]
        group.bench_with_input(BenchmarkId::new("parallel", cell), &options, |b, &options| {
            b.iter(|| {
                hog_cells::hog::cell_histograms_par(black_box(&rows), black_box(&columns), options)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gradient_field, bench_cell_histograms);
criterion_main!(benches);
