//! Direct volume rendering by ray marching.
//!
//! One ray per pixel is intersected with the volume's bounding box and the density
//! sampled along it is composited front-to-back (or reduced by maximum intensity).
//! See [`render::Renderer`] and [`render::ParallelRenderer`] for entry points.

pub mod camera;
pub mod common;
mod error;
pub mod render;
pub mod test_helpers;
pub mod volumetric;

pub use error::{Result, VolrayError};

pub mod color {
    use nalgebra::{vector, Vector4};

    /// Premultiplied, linear RGBA.
    pub type RGBA = Vector4<f32>;

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> RGBA {
        vector![r, g, b, a]
    }

    pub fn zero() -> RGBA {
        vector![0.0, 0.0, 0.0, 0.0]
    }

    pub fn mono(v: f32, opacity: f32) -> RGBA {
        vector![v, v, v, opacity]
    }
}
