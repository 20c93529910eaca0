use nalgebra::{point, Point3, Vector3};

use crate::common::{AxisTransform, BoundBox, ViewMode};

use super::BoxPlacement;

/// World-space placement of a volume for one frame.
///
/// The box is normalized so its longest side (in voxels) has length 1, scaled by the voxel
/// size, then centered on the origin (or pushed down -Z, see [`BoxPlacement`]).
/// The axis table of the view mode is used both to build the box and to map sample
/// points back, so [`VolumePlacement::to_sampling_space`] always inverts the placement.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumePlacement {
    bound_box: BoundBox,
    extent: Vector3<f32>,
    vol_size: Vector3<usize>,
    transform: AxisTransform,
    policy: BoxPlacement,
}

impl VolumePlacement {
    /// `vol_size` and `voxel_size` are given along the volume's own (sampling) axes.
    pub fn new(
        vol_size: Vector3<usize>,
        voxel_size: Vector3<f32>,
        view_mode: ViewMode,
        policy: BoxPlacement,
    ) -> VolumePlacement {
        let transform = view_mode.axis_transform();

        let max_dim = vol_size.iter().copied().max().unwrap_or(1).max(1) as f32;
        let sampling_extent = vol_size.map(|v| v as f32).component_mul(&voxel_size) / max_dim;
        let extent = transform.world_extent(sampling_extent);

        let half = extent / 2.0;
        let lower = match policy {
            BoxPlacement::Centered => Point3::from(-half),
            BoxPlacement::DepthOffset(offset) => point![-half.x, -half.y, -offset - extent.z],
        };

        VolumePlacement {
            bound_box: BoundBox::from_position_dims(lower, extent),
            extent,
            vol_size,
            transform,
            policy,
        }
    }

    pub fn bound_box(&self) -> BoundBox {
        self.bound_box
    }

    /// Box size along world axes
    pub fn extent(&self) -> Vector3<f32> {
        self.extent
    }

    pub fn policy(&self) -> BoxPlacement {
        self.policy
    }

    pub fn transform(&self) -> AxisTransform {
        self.transform
    }

    pub fn vol_size(&self) -> Vector3<usize> {
        self.vol_size
    }

    /// Step length covering one "average voxel": `|extent| / |voxel counts|`.
    pub fn reference_step(&self) -> f32 {
        self.extent.magnitude() / self.vol_size.map(|v| v as f32).magnitude()
    }

    /// World point to normalized sampling coordinates.
    /// Points inside the box land in `[0, 1]^3`, the result is not clamped.
    pub fn to_sampling_space(&self, pos: Point3<f32>) -> Point3<f32> {
        let normalized = (pos - self.bound_box.lower).component_div(&self.extent);
        self.transform.apply(Point3::from(normalized))
    }

    /// Inverse of [`VolumePlacement::to_sampling_space`].
    pub fn to_world_space(&self, sampling: Point3<f32>) -> Point3<f32> {
        let normalized = self.transform.invert(sampling);
        self.bound_box.lower + normalized.coords.component_mul(&self.extent)
    }
}

#[cfg(test)]
mod test {

    use approx::assert_relative_eq;
    use nalgebra::vector;

    use super::*;
    use crate::render::DEFAULT_DEPTH_OFFSET;

    fn placement(mode: ViewMode, policy: BoxPlacement) -> VolumePlacement {
        VolumePlacement::new(vector![64, 32, 16], vector![1.0, 2.0, 1.5], mode, policy)
    }

    #[test]
    fn centered_and_aspect_correct() {
        let p = VolumePlacement::new(
            vector![256, 128, 64],
            vector![1.0, 1.0, 1.0],
            ViewMode::Default,
            BoxPlacement::Centered,
        );

        assert_eq!(p.extent(), vector![1.0, 0.5, 0.25]);
        assert_eq!(p.bound_box().lower, point![-0.5, -0.25, -0.125]);
        assert_eq!(p.bound_box().upper, point![0.5, 0.25, 0.125]);
        assert_eq!(p.bound_box().center(), point![0.0, 0.0, 0.0]);
    }

    #[test]
    fn voxel_size_scales_box() {
        let p = placement(ViewMode::Default, BoxPlacement::Centered);

        assert_relative_eq!(p.extent(), vector![1.0, 1.0, 0.375]);
    }

    #[test]
    fn top_and_bottom_swap_extent() {
        for mode in [ViewMode::Top, ViewMode::Bottom] {
            let p = placement(mode, BoxPlacement::Centered);
            assert_relative_eq!(p.extent(), vector![1.0, 0.375, 1.0]);
        }
    }

    #[test]
    fn corners_map_to_unit_cube() {
        let expected = [
            (ViewMode::Default, point![0.0, 0.0, 1.0], point![1.0, 1.0, 0.0]),
            (ViewMode::Top, point![0.0, 0.0, 0.0], point![1.0, 1.0, 1.0]),
            (ViewMode::Bottom, point![0.0, 1.0, 1.0], point![1.0, 0.0, 0.0]),
        ];

        for policy in [
            BoxPlacement::Centered,
            BoxPlacement::DepthOffset(DEFAULT_DEPTH_OFFSET),
        ] {
            for (mode, at_lower, at_upper) in expected {
                let p = placement(mode, policy);
                let bbox = p.bound_box();
                assert_relative_eq!(p.to_sampling_space(bbox.lower), at_lower, epsilon = 1e-6);
                assert_relative_eq!(p.to_sampling_space(bbox.upper), at_upper, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn every_corner_inside_unit_cube() {
        for mode in ViewMode::ALL {
            let p = placement(mode, BoxPlacement::Centered);
            for corner in p.bound_box() {
                let s = p.to_sampling_space(corner);
                for i in 0..3 {
                    let c = s[i];
                    assert!(c.abs() < 1e-6 || (c - 1.0).abs() < 1e-6, "{mode} {s:?}");
                }
            }
        }
    }

    #[test]
    fn world_and_sampling_round_trip() {
        let s = point![0.2, 0.7, 0.4];
        for mode in ViewMode::ALL {
            let p = placement(mode, BoxPlacement::DepthOffset(3.0));
            assert_relative_eq!(p.to_sampling_space(p.to_world_space(s)), s, epsilon = 1e-5);
        }
    }

    #[test]
    fn depth_offset_pushes_box() {
        let p = placement(ViewMode::Default, BoxPlacement::DepthOffset(2.0));
        let bbox = p.bound_box();

        assert_relative_eq!(bbox.upper.z, -2.0, epsilon = 1e-6);
        assert_relative_eq!(bbox.lower.z, -2.375, epsilon = 1e-6);
        assert_eq!(bbox.center().x, 0.0);
        assert_eq!(bbox.center().y, 0.0);
        assert_eq!(p.policy(), BoxPlacement::DepthOffset(2.0));
    }

    #[test]
    fn reference_step_is_one_voxel_of_cube() {
        let p = VolumePlacement::new(
            vector![32, 32, 32],
            vector![1.0, 1.0, 1.0],
            ViewMode::Default,
            BoxPlacement::Centered,
        );

        assert_relative_eq!(p.reference_step(), 1.0 / 32.0, epsilon = 1e-6);
    }
}
