use nalgebra::{point, vector, Point2, Point3, Vector2};

use crate::{camera::CameraFrame, common::Ray};

use super::RayOrigin;

/// Primary ray through the centre of pixel `(x, y)`.
///
/// Row 0 is the top of the image. The horizontal axis is scaled by the aspect ratio,
/// so pixels stay square.
pub fn generate_ray(
    x: usize,
    y: usize,
    resolution: Vector2<usize>,
    camera: &CameraFrame,
    origin: RayOrigin,
) -> Ray {
    let res = resolution.map(|v| v as f32);
    let aspect = res.x / res.y;

    let pixel_x = x as f32 + 0.5;
    let pixel_y = y as f32 + 0.5;

    let ndc_x = aspect * (2.0 * pixel_x / res.x - 1.0);
    let ndc_y = 1.0 - 2.0 * pixel_y / res.y;

    let dir = vector![ndc_x, ndc_y, -camera.view_plane_dist].normalize();

    match origin {
        RayOrigin::Camera => Ray::new(camera.eye, camera.to_world_dir(dir).normalize()),
        RayOrigin::Fixed => Ray::new(point![0.0, 0.0, 0.0], dir),
    }
}

/// Where a camera-space point lands on the image, in `[0, 1]^2` when in view.
/// `None` for points at or behind the eye.
pub fn project_to_viewport(
    point: Point3<f32>,
    resolution: Vector2<usize>,
    view_plane_dist: f32,
) -> Option<Point2<f32>> {
    // Camera looks down -Z
    let depth = -point.z;
    if depth <= f32::EPSILON {
        return None;
    }

    let aspect = resolution.x as f32 / resolution.y as f32;
    let ndc_x = view_plane_dist * point.x / depth;
    let ndc_y = view_plane_dist * point.y / depth;

    Some(point![(ndc_x / aspect + 1.0) / 2.0, (1.0 - ndc_y) / 2.0])
}

#[cfg(test)]
mod test {

    use approx::assert_relative_eq;

    use super::*;
    use crate::camera::{Camera, OrbitCamera};

    #[test]
    fn centre_pixel_looks_down_z() {
        let camera = CameraFrame::looking_down_z(5.0, 1.5);

        let ray = generate_ray(1, 1, vector![3, 3], &camera, RayOrigin::Camera);

        assert_eq!(ray.origin, point![0.0, 0.0, 5.0]);
        assert_relative_eq!(ray.direction, vector![0.0, 0.0, -1.0]);
    }

    #[test]
    fn row_zero_is_top() {
        let camera = CameraFrame::looking_down_z(5.0, 1.0);

        let top = generate_ray(5, 0, vector![11, 11], &camera, RayOrigin::Camera);
        let bottom = generate_ray(5, 10, vector![11, 11], &camera, RayOrigin::Camera);

        assert!(top.direction.y > 0.0);
        assert!(bottom.direction.y < 0.0);
        assert_relative_eq!(top.direction.y, -bottom.direction.y);
    }

    #[test]
    fn aspect_ratio_widens_x() {
        let camera = CameraFrame::looking_down_z(5.0, 1.0);

        // Right edge of a 2:1 image reaches ndc x = 2 (minus half a pixel)
        let ray = generate_ray(199, 50, vector![200, 100], &camera, RayOrigin::Camera);
        let dir = ray.direction / -ray.direction.z;

        assert_relative_eq!(dir.x, 2.0 * (199.5 / 100.0 - 1.0), epsilon = 1e-5);
        assert_relative_eq!(dir.y, 1.0 - 2.0 * 50.5 / 100.0, epsilon = 1e-5);
    }

    #[test]
    fn directions_are_unit() {
        let mut orbit = OrbitCamera::new(60.0);
        orbit.set_orientation(0.0, 0.3, 2.0);
        let camera = orbit.frame();

        for (x, y) in [(0, 0), (17, 3), (31, 31)] {
            for origin in [RayOrigin::Camera, RayOrigin::Fixed] {
                let ray = generate_ray(x, y, vector![32, 32], &camera, origin);
                assert_relative_eq!(ray.direction.magnitude(), 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn centre_ray_follows_orbit() {
        let mut orbit = OrbitCamera::new(45.0);
        orbit.set_orientation(0.0, 0.7, -1.1);
        let camera = orbit.frame();

        let ray = generate_ray(2, 2, vector![5, 5], &camera, RayOrigin::Camera);

        assert_eq!(ray.origin, orbit.get_position());
        assert_relative_eq!(ray.direction, orbit.get_dir(), epsilon = 1e-5);
    }

    #[test]
    fn fixed_origin_ignores_camera() {
        let mut orbit = OrbitCamera::new(45.0);
        orbit.set_orientation(0.0, 0.7, -1.1);
        let camera = orbit.frame();

        let ray = generate_ray(2, 2, vector![5, 5], &camera, RayOrigin::Fixed);

        assert_eq!(ray.origin, point![0.0, 0.0, 0.0]);
        assert_relative_eq!(ray.direction, vector![0.0, 0.0, -1.0]);
    }

    #[test]
    fn projection_inverts_ray() {
        let resolution = vector![40, 20];
        let camera = CameraFrame::new(nalgebra::Matrix4::identity(), Point3::origin(), 1.7);

        let ray = generate_ray(13, 7, resolution, &camera, RayOrigin::Camera);
        let on_ray = ray.point_from_t(3.0);

        let projected = project_to_viewport(on_ray, resolution, 1.7).unwrap();

        assert_relative_eq!(projected, point![13.5 / 40.0, 7.5 / 20.0], epsilon = 1e-5);
        assert_eq!(project_to_viewport(point![0.0, 0.0, 1.0], resolution, 1.7), None);
    }
}
