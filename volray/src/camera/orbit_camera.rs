use std::f32::consts::{PI, TAU};

use nalgebra::{point, vector, Matrix4, Point3, Rotation3, Vector3, Vector4};

use super::Camera;

const DEFAULT_RADIUS: f32 = 3.0;

/// Camera orbiting the world origin on a sphere.
///
/// Y is up, the camera starts on the positive Z axis looking at the origin.
/// `zenith` is measured from +Y, `azimuth` around Y starting at +Z.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    eye: Point3<f32>,
    side: Vector3<f32>,
    up: Vector3<f32>,
    look_at: Vector3<f32>,
    view_plane_dist: f32,
    rotation_speed: f32,
    zenith: f32,
    azimuth: f32,
    radius: f32,
    /// Set whenever the view changed since the last [`OrbitCamera::take_changed`]
    is_changed: bool,
}

impl OrbitCamera {
    /// `fov_y` is the vertical field of view in degrees.
    pub fn new(fov_y: f32) -> OrbitCamera {
        Self::with_rotation_speed(fov_y, 0.5)
    }

    pub fn with_rotation_speed(fov_y: f32, rotation_speed: f32) -> OrbitCamera {
        let view_plane_dist = 1.0 / f32::tan(fov_y * PI / 360.0);
        let mut camera = OrbitCamera {
            eye: point![0.0, 0.0, DEFAULT_RADIUS],
            side: vector![1.0, 0.0, 0.0],
            up: vector![0.0, 1.0, 0.0],
            look_at: vector![0.0, 0.0, -1.0],
            view_plane_dist,
            rotation_speed,
            zenith: PI / 2.0,
            azimuth: 0.0,
            radius: DEFAULT_RADIUS,
            is_changed: true,
        };
        camera.reset();
        camera
    }

    /// Back to the initial position on +Z.
    pub fn reset(&mut self) {
        self.eye = point![0.0, 0.0, DEFAULT_RADIUS];
        self.side = vector![1.0, 0.0, 0.0];
        self.up = vector![0.0, 1.0, 0.0];
        self.look_at = vector![0.0, 0.0, -1.0];
        self.zenith = PI / 2.0;
        self.azimuth = 0.0;
        self.radius = DEFAULT_RADIUS;
        self.is_changed = true;
    }

    /// Move the camera.
    ///
    /// With both angles zero, dolly one unit along the look direction
    /// (towards the target for positive `zoom`).
    /// Otherwise rotate on the sphere by the angle deltas scaled by the rotation speed.
    pub fn set_orientation(&mut self, zoom: f32, d_zenith: f32, d_azimuth: f32) {
        if d_zenith == 0.0 && d_azimuth == 0.0 {
            if zoom > 0.0 {
                self.eye += self.look_at;
            } else if zoom < 0.0 {
                self.eye -= self.look_at;
            } else {
                return;
            }
            self.radius = self.eye.coords.magnitude();
            self.is_changed = true;
            return;
        }

        let new_zenith = (self.zenith + d_zenith * self.rotation_speed).clamp(0.0, PI);
        let new_azimuth = (self.azimuth + d_azimuth * self.rotation_speed).rem_euclid(TAU);

        if new_zenith == self.zenith && new_azimuth == self.azimuth {
            return;
        }

        self.zenith = new_zenith;
        self.azimuth = new_azimuth;

        self.eye = point![
            self.radius * self.zenith.sin() * self.azimuth.sin(),
            self.radius * self.zenith.cos(),
            self.radius * self.zenith.sin() * self.azimuth.cos()
        ];

        self.look_at = (-self.eye.coords).normalize();

        let world_up = Vector3::y();
        // At the poles the look vector is parallel to world up
        let side = if self.zenith == 0.0 || self.zenith == PI {
            Rotation3::from_axis_angle(&Vector3::y_axis(), self.azimuth) * Vector3::x()
        } else {
            self.look_at.cross(&world_up)
        };

        self.up = side.cross(&self.look_at).normalize();
        self.side = side.normalize();
        self.is_changed = true;
    }

    pub fn get_dir(&self) -> Vector3<f32> {
        self.look_at
    }

    pub fn zenith(&self) -> f32 {
        self.zenith
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Returns whether the view changed since the previous call, and clears the flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.is_changed, false)
    }
}

impl Camera for OrbitCamera {
    fn get_position(&self) -> Point3<f32> {
        self.eye
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        // Camera looks down its negative Z axis
        let back = -self.look_at;
        Matrix4::from_columns(&[
            Vector4::new(self.side.x, self.side.y, self.side.z, 0.0),
            Vector4::new(self.up.x, self.up.y, self.up.z, 0.0),
            Vector4::new(back.x, back.y, back.z, 0.0),
            Vector4::new(self.eye.x, self.eye.y, self.eye.z, 1.0),
        ])
    }

    fn view_plane_dist(&self) -> f32 {
        self.view_plane_dist
    }
}
