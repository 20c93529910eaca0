use nalgebra::{Point3, Vector3};

/// Length given to every generated ray.
/// Marching is bounded by the box exit, never by this value.
pub const RAY_LENGTH: f32 = 99_999_999.9;

/// Ray cast by camera.
/// Main usecase is getting intersections with volumes ([`super::BoundBox::intersect`]),
/// then iterating over the intersected line segment in steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Unit vector
    pub direction: Vector3<f32>,
    pub length: f32,
}

impl Ray {
    /// Construct new ray using `origin` and `direction`.
    /// `direction` must be unit vector.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Ray {
        Ray {
            origin,
            direction,
            length: RAY_LENGTH,
        }
    }

    /// Returns point `t` units far from ray origin in ray direction
    pub fn point_from_t(&self, t: f32) -> Point3<f32> {
        self.origin + t * self.direction
    }
}
