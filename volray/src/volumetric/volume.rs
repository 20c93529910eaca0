use nalgebra::{Point3, Vector3};

use crate::common::ValueRange;

/// Read-only 3D scalar field.
///
/// Samples are in raw data units (0-255 for 8-bit data, 0-65535 for 16-bit).
pub trait Volume {
    /// Voxel counts per axis
    fn get_size(&self) -> Vector3<usize>;

    /// Physical size of one voxel
    fn get_scale(&self) -> Vector3<f32>;

    /// Raw voxel value, `None` outside the volume.
    /// For building and tests, mostly
    fn get_data(&self, x: usize, y: usize, z: usize) -> Option<f32>;

    /// Trilinear interpolation sample at normalized coordinates.
    ///
    /// `pos` in `[0, 1]^3`, voxel `i` is centred at `(i + 0.5) / n`.
    /// Coordinates outside the volume are clamped to the edge voxels.
    fn sample_normalized(&self, pos: Point3<f32>) -> f32;

    /// Minimum and maximum sample
    fn get_range(&self) -> ValueRange;

    fn get_name(&self) -> &str {
        "Volume"
    }
}
