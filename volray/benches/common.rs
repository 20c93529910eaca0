use criterion::Criterion;
use nalgebra::{vector, Vector2};
use volray::{
    camera::{Camera, CameraFrame, OrbitCamera},
    render::{Image, ParallelRenderer, RenderOptions, Renderer},
    test_helpers::ball_volume,
};

pub const WIDTH: usize = 256;
pub const HEIGHT: usize = 256;
pub const RESOLUTION: Vector2<usize> = vector![WIDTH, HEIGHT];

/// Voxels per side of the benchmark volume
pub const VOLUME_SIDE: usize = 64;

/// Orbit moves `(d_zenith, d_azimuth)` applied one after another
pub const DEFAULT_CAMERA_MOVES: [(f32, f32); 3] = [(0.0, 0.0), (0.6, 0.8), (-1.1, 2.3)];

#[derive(Debug, Clone, Copy)]
pub enum Algorithm {
    Serial,
    Parallel,
}

pub struct BenchOptions {
    pub render_options: RenderOptions,
    pub name: String,
    pub algorithm: Algorithm,
    pub camera_moves: &'static [(f32, f32)],
}

impl BenchOptions {
    pub fn new(
        render_options: RenderOptions,
        name: String,
        algorithm: Algorithm,
        camera_moves: &'static [(f32, f32)],
    ) -> Self {
        Self {
            render_options,
            name,
            algorithm,
            camera_moves,
        }
    }

    fn cameras(&self) -> Vec<CameraFrame> {
        let mut orbit = OrbitCamera::new(45.0);
        self.camera_moves
            .iter()
            .map(|&(d_zenith, d_azimuth)| {
                orbit.set_orientation(0.0, d_zenith, d_azimuth);
                orbit.frame()
            })
            .collect()
    }

    pub fn get_benchmark(self) -> impl FnOnce(&mut Criterion) {
        move |c| {
            let cameras = self.cameras();
            let mut image = Image::new(self.render_options.resolution);
            let volume = ball_volume(VOLUME_SIDE);

            match self.algorithm {
                Algorithm::Serial => {
                    let renderer = Renderer::new(volume, self.render_options);
                    c.bench_function(&self.name, |b| {
                        b.iter(|| {
                            for camera in &cameras {
                                renderer.render(camera, &mut image);
                            }
                        })
                    });
                }
                Algorithm::Parallel => {
                    let renderer = ParallelRenderer::new(volume, self.render_options);
                    c.bench_function(&self.name, |b| {
                        b.iter(|| {
                            for camera in &cameras {
                                if let Err(e) = renderer.render(camera, &mut image) {
                                    panic!("render failed: {e}");
                                }
                            }
                        })
                    });
                }
            }
        }
    }
}
