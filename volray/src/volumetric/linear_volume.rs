use log::info;
use nalgebra::{vector, Point3, Vector3, Vector4};

use crate::{common::ValueRange, Result, VolrayError};

use super::{
    vol_builder::{BuildVolume, SampleFormat, VolumeMetadata},
    Volume,
};

/// Volume stored as one dense array, X growing fastest.
pub struct LinearVolume {
    size: Vector3<usize>,
    scale: Vector3<f32>, // shape of voxels
    data: Vec<f32>,
    range: ValueRange,
    format: SampleFormat,
}

impl std::fmt::Debug for LinearVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearVolume")
            .field("size", &self.size)
            .field("scale", &self.scale)
            .field("range", &self.range)
            .field("data len ", &self.data.len())
            .finish()
    }
}

fn voxel_count(size: Vector3<usize>) -> Result<usize> {
    if size.iter().any(|&d| d == 0) {
        return Err(VolrayError::InvalidData(format!(
            "Volume dimensions must be positive, got {size:?}"
        )));
    }
    size.x
        .checked_mul(size.y)
        .and_then(|n| n.checked_mul(size.z))
        .ok_or_else(|| VolrayError::InvalidData(format!("Volume {size:?} is too large")))
}

impl LinearVolume {
    /// Build from already decoded samples.
    pub fn from_samples(
        size: Vector3<usize>,
        scale: Vector3<f32>,
        data: Vec<f32>,
        format: SampleFormat,
    ) -> Result<LinearVolume> {
        let expected = voxel_count(size)?;
        if data.len() != expected {
            return Err(VolrayError::InvalidData(format!(
                "Expected {expected} samples, got {}",
                data.len()
            )));
        }

        let range = ValueRange::from_samples(data.iter());

        Ok(LinearVolume {
            size,
            scale,
            data,
            range,
            format,
        })
    }

    /// Build by evaluating `f` at every voxel index.
    /// Values are stored as returned, `format` only records their nominal width.
    pub fn from_fn<F>(
        size: Vector3<usize>,
        scale: Vector3<f32>,
        format: SampleFormat,
        mut f: F,
    ) -> Result<LinearVolume>
    where
        F: FnMut(usize, usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(voxel_count(size)?);
        for z in 0..size.z {
            for y in 0..size.y {
                for x in 0..size.x {
                    data.push(f(x, y, z));
                }
            }
        }
        Self::from_samples(size, scale, data, format)
    }

    pub fn get_format(&self) -> SampleFormat {
        self.format
    }

    /// Zero the first and last Z slice, which often hold scanner garbage.
    pub fn clear_end_slices(&mut self) {
        let slice_len = self.size.x * self.size.y;
        let last_start = slice_len * (self.size.z - 1);

        self.data[..slice_len].fill(0.0);
        self.data[last_start..].fill(0.0);

        self.range = ValueRange::from_samples(self.data.iter());
    }

    fn get_3d_index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.size.x + z * self.size.x * self.size.y
    }

    fn voxel(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[self.get_3d_index(x, y, z)]
    }
}

impl Volume for LinearVolume {
    fn get_size(&self) -> Vector3<usize> {
        self.size
    }

    fn get_scale(&self) -> Vector3<f32> {
        self.scale
    }

    fn get_data(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        if x >= self.size.x || y >= self.size.y || z >= self.size.z {
            return None;
        }
        Some(self.voxel(x, y, z))
    }

    fn sample_normalized(&self, pos: Point3<f32>) -> f32 {
        let size_f = self.size.map(|v| v as f32);
        let max_texel = size_f - vector![1.0, 1.0, 1.0];

        // Texel space, clamped to edge voxel centres
        let texel = pos.coords.component_mul(&size_f) - vector![0.5, 0.5, 0.5];
        let texel = texel.zip_map(&max_texel, |v, max| v.clamp(0.0, max));

        let low_f = texel.map(f32::floor);
        let t = texel - low_f;

        let low = low_f.map(|v| v as usize);
        let high = low.zip_map(&self.size, |l, s| usize::min(l + 1, s - 1));

        // first plane
        // c000, c010, c001, c011
        let x_low_vec = vector![
            self.voxel(low.x, low.y, low.z),
            self.voxel(low.x, high.y, low.z),
            self.voxel(low.x, low.y, high.z),
            self.voxel(low.x, high.y, high.z)
        ];

        // second plane
        // c100, c110, c101, c111
        let x_hi_vec = vector![
            self.voxel(high.x, low.y, low.z),
            self.voxel(high.x, high.y, low.z),
            self.voxel(high.x, low.y, high.z),
            self.voxel(high.x, high.y, high.z)
        ];

        // Lerp as a + (b - a) * t, exact when neighbours are equal

        // x plane
        let x_plane: Vector4<f32> = x_low_vec + (x_hi_vec - x_low_vec) * t.x;

        // y line
        let c0 = x_plane.x + (x_plane.y - x_plane.x) * t.y;
        let c1 = x_plane.z + (x_plane.w - x_plane.z) * t.y;

        c0 + (c1 - c0) * t.z
    }

    fn get_range(&self) -> ValueRange {
        self.range
    }

    fn get_name(&self) -> &str {
        "LinearVolume"
    }
}

impl BuildVolume for LinearVolume {
    fn build(metadata: VolumeMetadata) -> Result<LinearVolume> {
        let VolumeMetadata {
            size,
            scale,
            data,
            format,
            data_offset,
        } = metadata;

        let slice = data.get_slice();
        let slice = slice.get(data_offset..).ok_or_else(|| {
            VolrayError::InvalidData(format!("Data offset {data_offset} past end of data"))
        })?;

        let samples = format.decode(slice, voxel_count(size)?)?;

        let volume = LinearVolume::from_samples(size, scale, samples, format)?;

        info!(
            "New linear volume, size {:?} scale {:?} range {:?}",
            size, scale, volume.range
        );

        Ok(volume)
    }
}
