// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use image_rs::{Rgba, RgbaImage};
use raster_tools::brush::{gaussian_stroke, mosaic_stroke};
use raster_tools::render::DrawSurface;
use std::hint::black_box;

fn sample_surface() -> DrawSurface {
    let image = RgbaImage::from_fn(1024, 768, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    DrawSurface::from_rgba(&image).unwrap()
}

fn brush_stroke_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("brush_strokes");
    let base = sample_surface();

    group.bench_function("gaussian_r40_s10", |b| {
        b.iter(|| {
            let mut surface = base.clone();
            gaussian_stroke(&mut surface, black_box((512.0, 384.0)), 40.0, 10.0).unwrap();
            black_box(surface)
        });
    });

    group.bench_function("mosaic_r40_b10", |b| {
        b.iter(|| {
            let mut surface = base.clone();
            mosaic_stroke(&mut surface, black_box((512.0, 384.0)), 40.0, 10);
            black_box(surface)
        });
    });

    group.finish();
}

criterion_group!(benches, brush_stroke_benchmark);
criterion_main!(benches);
