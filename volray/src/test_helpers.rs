//! Module with helper functions
//! Saves repetition in unit tests

use nalgebra::{vector, Vector3};

use crate::volumetric::{
    BuildVolume, DataSource, LinearVolume, SampleFormat, Volume, VolumeMetadata,
};

/// Samples of [`white_volume`], x fastest
pub const WHITE_DATA: [u8; 8] = [0, 32, 64, 64 + 32, 128, 128 + 32, 128 + 64, 255];

pub fn white_vol_meta() -> VolumeMetadata {
    VolumeMetadata {
        size: vector![2, 2, 2],
        scale: vector![1.0, 1.0, 1.0], // shape of voxels
        data: DataSource::from_vec(WHITE_DATA.to_vec()),
        format: SampleFormat::U8,
        data_offset: 0,
    }
}

/// 2x2x2 volume, brightness growing with the voxel index
pub fn white_volume<V>() -> V
where
    V: Volume + BuildVolume,
{
    match V::build(white_vol_meta()) {
        Ok(volume) => volume,
        Err(e) => panic!("white volume: {e}"),
    }
}

/// Every voxel set to `value`
pub fn uniform_volume(size: Vector3<usize>, value: f32) -> LinearVolume {
    let volume = LinearVolume::from_fn(size, vector![1.0, 1.0, 1.0], SampleFormat::U8, |_, _, _| {
        value
    });
    match volume {
        Ok(volume) => volume,
        Err(e) => panic!("uniform volume: {e}"),
    }
}

pub fn empty_volume(size: Vector3<usize>) -> LinearVolume {
    uniform_volume(size, 0.0)
}

/// Cube of `side` voxels holding a ball with smooth falloff,
/// 255 in the centre and 0 at the inscribed sphere and beyond.
pub fn ball_volume(side: usize) -> LinearVolume {
    let side_f = side as f32;
    let f = |x: usize, y: usize, z: usize| {
        let p = vector![x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5] / side_f;
        let r = (p - vector![0.5, 0.5, 0.5]).magnitude();
        let falloff = (1.0 - r / 0.5).max(0.0);
        255.0 * falloff * falloff
    };
    match LinearVolume::from_fn(
        vector![side, side, side],
        vector![1.0, 1.0, 1.0],
        SampleFormat::U8,
        f,
    ) {
        Ok(volume) => volume,
        Err(e) => panic!("ball volume: {e}"),
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn helpers_build() {
        let white: LinearVolume = white_volume();
        assert_eq!(white.get_data(1, 1, 1), Some(255.0));

        let ball = ball_volume(16);
        assert!(ball.get_data(8, 8, 8).unwrap() > 150.0);
        assert_eq!(ball.get_data(0, 0, 0), Some(0.0));

        assert_eq!(empty_volume(vector![3, 3, 3]).get_range().high, 0.0);
    }
}
