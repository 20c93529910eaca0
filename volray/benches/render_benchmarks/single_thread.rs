use crate::common::{Algorithm, BenchOptions, DEFAULT_CAMERA_MOVES, HEIGHT, RESOLUTION, WIDTH};
use criterion::Criterion;
use volray::render::RenderOptions;

pub fn render_composite(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .ert_threshold(None)
        .viewport_culling(false)
        .build_unchecked();

    let bench_options = BenchOptions::new(
        render_options,
        format!("Render ST | composite | {WIDTH}x{HEIGHT} | no optim"),
        Algorithm::Serial,
        &DEFAULT_CAMERA_MOVES,
    );

    let benchmark = bench_options.get_benchmark();

    benchmark(c);
}

pub fn render_composite_ert(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .viewport_culling(false)
        .build_unchecked();

    let bench_options = BenchOptions::new(
        render_options,
        format!("Render ST | composite | {WIDTH}x{HEIGHT} | ERT"),
        Algorithm::Serial,
        &DEFAULT_CAMERA_MOVES,
    );

    let benchmark = bench_options.get_benchmark();

    benchmark(c);
}

pub fn render_composite_ert_culling(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .build_unchecked();

    let bench_options = BenchOptions::new(
        render_options,
        format!("Render ST | composite | {WIDTH}x{HEIGHT} | ERT + culling"),
        Algorithm::Serial,
        &DEFAULT_CAMERA_MOVES,
    );

    let benchmark = bench_options.get_benchmark();

    benchmark(c);
}

pub fn render_mip(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .mip(true)
        .build_unchecked();

    let bench_options = BenchOptions::new(
        render_options,
        format!("Render ST | MIP | {WIDTH}x{HEIGHT} | culling"),
        Algorithm::Serial,
        &DEFAULT_CAMERA_MOVES,
    );

    let benchmark = bench_options.get_benchmark();

    benchmark(c);
}
