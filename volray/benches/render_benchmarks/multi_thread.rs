use crate::common::{Algorithm, BenchOptions, DEFAULT_CAMERA_MOVES, HEIGHT, RESOLUTION, WIDTH};
use criterion::Criterion;
use volray::render::RenderOptions;

pub fn render_parallel(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .build_unchecked();

    let bench_options = BenchOptions::new(
        render_options,
        format!("Render MT | composite | {WIDTH}x{HEIGHT} | ERT + culling"),
        Algorithm::Parallel,
        &DEFAULT_CAMERA_MOVES,
    );

    let benchmark = bench_options.get_benchmark();

    benchmark(c);
}

pub fn render_parallel_half_step(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .step_scale(0.5)
        .build_unchecked();

    let bench_options = BenchOptions::new(
        render_options,
        format!("Render MT | composite | {WIDTH}x{HEIGHT} | half step"),
        Algorithm::Parallel,
        &DEFAULT_CAMERA_MOVES,
    );

    let benchmark = bench_options.get_benchmark();

    benchmark(c);
}
