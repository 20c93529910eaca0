use nalgebra::{point, Point3, Vector3};

use super::Ray;

/// Axis aligned box in world space.
/// Invariant: `lower <= upper` component-wise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundBox {
    pub lower: Point3<f32>,
    pub upper: Point3<f32>,
}

impl BoundBox {
    pub fn new(lower: Point3<f32>, upper: Point3<f32>) -> BoundBox {
        BoundBox { lower, upper }
    }

    pub fn from_position_dims(position: Point3<f32>, dimensions: Vector3<f32>) -> BoundBox {
        BoundBox {
            lower: position,
            upper: position + dimensions,
        }
    }

    pub fn dims(&self) -> Vector3<f32> {
        self.upper - self.lower
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.lower, &self.upper)
    }

    /// Slab test.
    ///
    /// Returns parametric entry and exit distances `(t_min, t_max)`.
    /// The box counts as hit only if `t_max > max(t_min, 0)`: boxes behind the origin,
    /// rays grazing an edge (`t_max == t_min`) and rays leaving a face at `t = 0` all miss.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        // Division by zero gives infinities, which the min/max below absorb
        let dir_inv = ray.direction.map(|d| 1.0 / d);

        // t value of intersection with the 6 planes of a bounding box
        let min_diff = (self.lower - ray.origin).component_mul(&dir_inv);
        let max_diff = (self.upper - ray.origin).component_mul(&dir_inv);

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            t_min = f32::max(t_min, f32::min(min_diff[axis], max_diff[axis]));
            t_max = f32::min(t_max, f32::max(min_diff[axis], max_diff[axis]));

            // X and Y already disjoint
            if axis == 1 && t_max < t_min {
                return None;
            }
        }

        if t_max > f32::max(t_min, 0.0) {
            Some((t_min, t_max))
        } else {
            None
        }
    }
}

pub struct BoundBoxIterator {
    pub lower: Point3<f32>,
    pub upper: Point3<f32>,
    state: u8,
}

impl Iterator for BoundBoxIterator {
    type Item = Point3<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        let p = match self.state {
            0 => self.lower,
            1 => point![self.upper.x, self.lower.y, self.lower.z],
            2 => point![self.upper.x, self.upper.y, self.lower.z],
            3 => point![self.lower.x, self.upper.y, self.lower.z],
            4 => point![self.lower.x, self.lower.y, self.upper.z],
            5 => point![self.upper.x, self.lower.y, self.upper.z],
            6 => self.upper,
            7 => point![self.lower.x, self.upper.y, self.upper.z],
            _ => return None,
        };
        self.state += 1;
        Some(p)
    }
}

impl IntoIterator for BoundBox {
    type Item = Point3<f32>;

    type IntoIter = BoundBoxIterator;

    fn into_iter(self) -> Self::IntoIter {
        BoundBoxIterator {
            lower: self.lower,
            upper: self.upper,
            state: 0,
        }
    }
}
