use nalgebra::{Point3, Vector3};

use super::SampleGenerator;

/// Density falls off quadratically from `sample` at the centre to zero at
/// half of the shortest side
pub struct BallGenerator {
    sample: u16,
    center: Point3<f32>,
    radius: f32,
}

impl BallGenerator {
    pub fn new(dims: Vector3<u32>, sample: u16) -> BallGenerator {
        let dims_f = dims.cast::<f32>();
        BallGenerator {
            sample,
            center: Point3::from((dims_f - Vector3::repeat(1.0)) / 2.0),
            radius: dims_f.min() / 2.0,
        }
    }
}

impl SampleGenerator for BallGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> u16 {
        let r = (Point3::from(coords.cast::<f32>()) - self.center).magnitude() / self.radius;
        let falloff = (1.0 - r).max(0.0);
        (self.sample as f32 * falloff * falloff).round() as u16
    }
}

#[cfg(test)]
mod test {

    use nalgebra::vector;

    use super::*;

    #[test]
    fn peak_at_center() {
        let gen = BallGenerator::new(vector![9, 9, 9], 200);

        assert_eq!(gen.sample_at(vector![4, 4, 4]), 200);
        assert_eq!(gen.sample_at(vector![0, 0, 0]), 0);

        let near = gen.sample_at(vector![5, 4, 4]);
        let far = gen.sample_at(vector![7, 4, 4]);
        assert!(near > far && far > 0);
    }
}
