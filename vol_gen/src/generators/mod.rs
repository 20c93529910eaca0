use indicatif::{ProgressBar, ProgressStyle};
use nalgebra::{vector, Vector3};
use rayon::prelude::*;

use crate::config::{Config, GeneratorConfig};

mod ball;
mod shapes;
mod solid;

pub use ball::BallGenerator;
pub use shapes::ShapesGenerator;
pub use solid::SolidGenerator;

// Generates one sample at a time, at any location
pub trait SampleGenerator: Sync {
    fn sample_at(&self, coords: Vector3<u32>) -> u16;
}

pub fn get_sample_generator(config: &Config) -> Box<dyn SampleGenerator> {
    match config.generator {
        GeneratorConfig::Shapes {
            n_of_shapes,
            sample,
            obj_size,
        } => Box::new(ShapesGenerator::new(
            config.dims,
            n_of_shapes,
            sample,
            obj_size,
            config.seed,
        )),
        GeneratorConfig::Solid { sample } => Box::new(SolidGenerator::new(config.dims, sample)),
        GeneratorConfig::Ball { sample } => Box::new(BallGenerator::new(config.dims, sample)),
    }
}

/// All samples, x fastest then y then z.
/// Z slices are generated in parallel.
pub fn generate_samples(
    gen: &dyn SampleGenerator,
    dims: Vector3<u32>,
    progress: &ProgressBar,
) -> Vec<u16> {
    let slice_len = dims.x as usize * dims.y as usize;
    let mut samples = vec![0; slice_len * dims.z as usize];

    samples
        .par_chunks_mut(slice_len)
        .enumerate()
        .for_each(|(z, slice)| {
            for y in 0..dims.y {
                for x in 0..dims.x {
                    let index = (y * dims.x + x) as usize;
                    slice[index] = gen.sample_at(vector![x, y, z as u32]);
                }
            }
            progress.inc(1);
        });

    samples
}

pub fn slice_progress_bar(dims: Vector3<u32>) -> ProgressBar {
    let bar = ProgressBar::new(dims.z as u64);
    bar.set_style(
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} slices"),
    );
    bar
}
