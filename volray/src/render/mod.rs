//! Ray marching renderer.
//!
//! Per pixel: [`generate_ray`] -> [`BoundBox::intersect`](crate::common::BoundBox::intersect)
//! -> [`march`] through the volume -> pixel of the [`Image`].

mod density_window;
mod image;
mod marcher;
mod parallel_renderer;
mod placement;
mod ray_gen;
mod render_options;
mod renderer;

pub use density_window::DensityWindow;
pub use image::{Image, GAMMA};
pub use marcher::{
    accumulate, march, Accumulator, Compositing, MarchOutcome, MarchSettings, MaximumIntensity,
    Sample, SampleMarcher, Termination,
};
pub use parallel_renderer::{ParallelRenderer, TILE_SIDE};
pub use placement::VolumePlacement;
pub use ray_gen::{generate_ray, project_to_viewport};
pub use render_options::{
    BoxPlacement, ProjectionMode, RayOrigin, RenderOptions, RenderOptionsBuilder,
    DEFAULT_DEPTH_OFFSET, DEFAULT_ENTRY_EPSILON, DEFAULT_ERT_THRESHOLD, DEFAULT_MAX_ITERATIONS,
};
pub use renderer::{Frame, Renderer};
