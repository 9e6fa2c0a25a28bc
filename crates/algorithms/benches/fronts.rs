//! Benchmarks for the front detection pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sied_algorithms::filter::{smooth, FilterKind};
use sied_algorithms::fronts::{analyze_window, detect_fronts, FrontParams, HistogramParams};
use sied_core::{FlagRaster, PixelFlag, Raster, ValidPixels};

/// Two water masses separated by a meandering front, with some texture
fn create_test_scene(size: usize) -> Raster<f64> {
    let mut r = Raster::new(size, size);
    let mid = size as f64 / 2.0;
    for row in 0..size {
        for col in 0..size {
            let front = mid + 6.0 * (row as f64 * 0.08).sin();
            let base = if (col as f64) < front { 14.0 } else { 19.0 };
            let texture = ((row * 7 + col * 13) % 17) as f64 * 0.02;
            r.set(row, col, base + texture).unwrap();
        }
    }
    r
}

fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("fronts/smooth");
    for size in [128, 256, 512] {
        let raster = create_test_scene(size);
        let flags = FlagRaster::all(size, size, PixelFlag::ocean());
        for kind in [FilterKind::Gaussian, FilterKind::Median] {
            let id = BenchmarkId::new(format!("{kind:?}"), size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| {
                    smooth(black_box(&raster), &flags, 2, kind, ValidPixels::OceanClear).unwrap()
                })
            });
        }
    }
    group.finish();
}

fn bench_bimodality(c: &mut Criterion) {
    let mut group = c.benchmark_group("fronts/bimodality");
    let params = HistogramParams::default();
    for size in [16, 32, 56] {
        let raster = create_test_scene(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| analyze_window(black_box(raster.view()), &params))
        });
    }
    group.finish();
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("fronts/detect");
    group.sample_size(10);
    let params = FrontParams::default();
    for size in [128, 256] {
        let raster = create_test_scene(size);
        let flags = FlagRaster::all(size, size, PixelFlag::ocean());
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| detect_fronts(black_box(&raster), &flags, &params).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_smoothing, bench_bimodality, bench_detect);
criterion_main!(benches);
