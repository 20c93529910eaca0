use std::ops::RangeBounds;

use nalgebra::{vector, Vector3};

use super::SampleGenerator;

/// Generate volume with a number of randomly placed shapes
pub struct ShapesGenerator {
    shapes: Vec<ShapeInfo>,
}

impl ShapesGenerator {
    pub fn new(
        dims: Vector3<u32>,
        n_of_shapes: usize,
        sample: u16,
        obj_size: u32,
        seed: Option<u64>,
    ) -> ShapesGenerator {
        let size = Vector3::repeat(obj_size).zip_map(&dims, u32::min);
        let size_variance = size / 10;
        let sample_variance = sample / 10;

        let random_shape_gen =
            ShapeInfoGenerator::new(dims, size, size_variance, sample, sample_variance, seed);
        let shapes = random_shape_gen.get_shapes(n_of_shapes);
        ShapesGenerator { shapes }
    }
}

impl SampleGenerator for ShapesGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> u16 {
        self.shapes
            .iter()
            .find(|shape| shape.contains(coords))
            .map(|shape| shape.render_at(coords - shape.position_low))
            .unwrap_or(0)
    }
}

// # of enum ShapeType variants
const N_OF_SHAPE_KINDS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Cuboid,
    Sphere,
}

/// One shape in volume, bounds are inclusive
#[derive(Debug)]
pub struct ShapeInfo {
    pub position_low: Vector3<u32>,
    pub position_high: Vector3<u32>,
    pub shape_type: ShapeType,
    pub sample: u16,
}

impl ShapeInfo {
    pub fn new(
        position_low: Vector3<u32>,
        position_high: Vector3<u32>,
        shape_type: ShapeType,
        sample: u16,
    ) -> Self {
        Self {
            position_low,
            position_high,
            shape_type,
            sample,
        }
    }

    fn contains(&self, coords: Vector3<u32>) -> bool {
        (0..3).all(|i| coords[i] >= self.position_low[i] && coords[i] <= self.position_high[i])
    }

    fn render_at(&self, offset: Vector3<u32>) -> u16 {
        match self.shape_type {
            ShapeType::Cuboid => self.sample,
            ShapeType::Sphere => self.render_sphere(offset),
        }
    }

    fn render_sphere(&self, offset: Vector3<u32>) -> u16 {
        let offset_f = offset.cast::<f32>();
        let extent = (self.position_high - self.position_low).cast::<f32>();

        let center = extent / 2.0;
        let r = extent.min() / 2.0;

        if (offset_f - center).magnitude() <= r {
            self.sample
        } else {
            0
        }
    }
}

/// Generate shapes
/// Helper type
pub struct ShapeInfoGenerator {
    rng: fastrand::Rng,
    vol_dims: Vector3<u32>,
    size: Vector3<u32>,
    size_variance: Vector3<u32>,
    sample: u16,
    sample_variance: u16,
}

impl ShapeInfoGenerator {
    pub fn new(
        vol_dims: Vector3<u32>,
        size: Vector3<u32>,
        size_variance: Vector3<u32>,
        sample: u16,
        sample_variance: u16,
        seed: Option<u64>,
    ) -> Self {
        let rng = fastrand::Rng::new();
        if let Some(seed) = seed {
            rng.seed(seed);
        }

        Self {
            rng,
            vol_dims,
            size,
            size_variance,
            sample,
            sample_variance,
        }
    }

    fn random_shape(&self) -> ShapeType {
        if self.rng.u8(0..N_OF_SHAPE_KINDS) == 0 {
            ShapeType::Cuboid
        } else {
            ShapeType::Sphere
        }
    }

    fn random_vector<R>(&self, ranges: Vector3<R>) -> Vector3<u32>
    where
        R: RangeBounds<u32> + Clone,
    {
        vector![
            self.rng.u32(ranges[0].clone()),
            self.rng.u32(ranges[1].clone()),
            self.rng.u32(ranges[2].clone())
        ]
    }

    pub fn get_shapes(&self, n: usize) -> Vec<ShapeInfo> {
        (0..n).map(|_| self.get_shape()).collect()
    }

    pub fn get_shape(&self) -> ShapeInfo {
        let shape_type = self.random_shape();

        let size_min = self.size - self.size_variance;
        let size_max = (self.size + self.size_variance).zip_map(&self.vol_dims, u32::min);

        let size_ranges = vector![
            size_min.x..=size_max.x,
            size_min.y..=size_max.y,
            size_min.z..=size_max.z
        ];
        let size = self.random_vector(size_ranges);

        // Spawn shape in positions it fits
        let pos_ranges = vector![
            0..=(self.vol_dims.x - size.x),
            0..=(self.vol_dims.y - size.y),
            0..=(self.vol_dims.z - size.z)
        ];
        let position_low = self.random_vector(pos_ranges);

        // Size is at least 1 along every axis
        let position_high = position_low + size.map(|s| s.saturating_sub(1));

        ShapeInfo::new(position_low, position_high, shape_type, self.random_sample())
    }

    fn random_sample(&self) -> u16 {
        // Saturating, so there is no overflow
        let low = self.sample.saturating_sub(self.sample_variance).max(1);
        let high = self.sample.saturating_add(self.sample_variance);
        self.rng.u16(low..=high.max(low))
    }
}
