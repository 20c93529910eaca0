use nalgebra::{vector, Vector3};

use super::SampleGenerator;

const MAX_PAD: u32 = 5;

/// Generate solid volume
/// All samples inside the padding have the same value
pub struct SolidGenerator {
    /// The sample value
    sample: u16,
    pad: u32,
    dims: Vector3<u32>,
}

impl SolidGenerator {
    pub fn new(dims: Vector3<u32>, sample: u16) -> SolidGenerator {
        // Small volumes keep at least half of each axis
        let pad = MAX_PAD.min(dims.min() / 4);
        SolidGenerator { sample, pad, dims }
    }
}

impl SampleGenerator for SolidGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> u16 {
        let pad_end = self.dims - vector![self.pad, self.pad, self.pad];
        if coords.x < self.pad
            || coords.y < self.pad
            || coords.z < self.pad
            || coords.x >= pad_end.x
            || coords.y >= pad_end.y
            || coords.z >= pad_end.z
        {
            0
        } else {
            self.sample
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn padded_border() {
        let gen = SolidGenerator::new(vector![20, 20, 20], 100);

        assert_eq!(gen.sample_at(vector![0, 0, 0]), 0);
        assert_eq!(gen.sample_at(vector![4, 10, 10]), 0);
        assert_eq!(gen.sample_at(vector![5, 5, 5]), 100);
        assert_eq!(gen.sample_at(vector![14, 14, 14]), 100);
        assert_eq!(gen.sample_at(vector![15, 10, 10]), 0);
    }

    #[test]
    fn tiny_volume_not_empty() {
        let gen = SolidGenerator::new(vector![3, 3, 3], 7);

        assert_eq!(gen.sample_at(vector![1, 1, 1]), 7);
        assert_eq!(gen.sample_at(vector![0, 2, 1]), 7);
    }
}
