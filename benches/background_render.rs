// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use raster_tools::domain::editing::{GradientAngle, MeshCells};
use raster_tools::render::background::render_background;
use raster_tools::render::{BackgroundSpec, CanvasSize, ColorStops, MeshGrid};
use std::hint::black_box;

fn background_render_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("background_render");
    let size = CanvasSize::default();

    let linear = BackgroundSpec::Linear {
        angle: GradientAngle::new(45.0),
        stops: ColorStops::default(),
    };
    group.bench_function("linear_1920x1080", |b| {
        b.iter(|| black_box(render_background(black_box(&linear), size).unwrap()));
    });

    let mesh = BackgroundSpec::Mesh(MeshGrid::seeded(MeshCells::new(4), MeshCells::new(4), 42));
    group.bench_function("mesh_4x4_1920x1080", |b| {
        b.iter(|| black_box(render_background(black_box(&mesh), size).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, background_render_benchmark);
criterion_main!(benches);
