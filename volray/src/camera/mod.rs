use nalgebra::{vector, Matrix4, Point3, Vector4};

mod orbit_camera;

pub use orbit_camera::OrbitCamera;

/// Anything that can provide the per-frame camera input of the renderer.
pub trait Camera {
    fn get_position(&self) -> Point3<f32>;

    // return matrix M
    // M * camera_space = world_space
    fn view_matrix(&self) -> Matrix4<f32>;

    /// Distance of the image plane from the eye, in camera space.
    fn view_plane_dist(&self) -> f32;

    /// Snapshot used for one frame.
    fn frame(&self) -> CameraFrame {
        CameraFrame::new(
            self.view_matrix(),
            self.get_position(),
            self.view_plane_dist(),
        )
    }
}

/// Frame-constant camera state: world-from-camera transform, eye position
/// and view-plane distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub view_matrix: Matrix4<f32>,
    pub eye: Point3<f32>,
    pub view_plane_dist: f32,
}

impl CameraFrame {
    pub fn new(view_matrix: Matrix4<f32>, eye: Point3<f32>, view_plane_dist: f32) -> Self {
        Self {
            view_matrix,
            eye,
            view_plane_dist,
        }
    }

    /// Camera at `(0, 0, eye_z)` looking down the negative Z axis.
    pub fn looking_down_z(eye_z: f32, view_plane_dist: f32) -> Self {
        let eye = Point3::new(0.0, 0.0, eye_z);
        let mut view_matrix = Matrix4::identity();
        view_matrix.set_column(3, &Vector4::new(eye.x, eye.y, eye.z, 1.0));
        Self::new(view_matrix, eye, view_plane_dist)
    }

    /// Camera-space direction into world space (rotation part only).
    pub fn to_world_dir(&self, dir: nalgebra::Vector3<f32>) -> nalgebra::Vector3<f32> {
        let world = self.view_matrix * vector![dir.x, dir.y, dir.z, 0.0];
        world.xyz()
    }

    /// World-space point into camera space, relative to the eye.
    /// Inverse of the ray direction transform; `None` if the rotation part is singular.
    pub fn to_camera_space(&self, point: &Point3<f32>) -> Option<Point3<f32>> {
        let rotation = self.view_matrix.fixed_slice::<3, 3>(0, 0).into_owned();
        let inverse = rotation.try_inverse()?;
        Some(Point3::from(inverse * (point - self.eye)))
    }
}

impl Camera for CameraFrame {
    fn get_position(&self) -> Point3<f32> {
        self.eye
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    fn view_plane_dist(&self) -> f32 {
        self.view_plane_dist
    }
}
