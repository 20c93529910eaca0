use nalgebra::{vector, Vector2, Vector3};

use crate::{common::ViewMode, Result, VolrayError};

use super::DensityWindow;

/// Distance of the box's near face from the fixed ray origin
pub const DEFAULT_DEPTH_OFFSET: f32 = 2.0;
/// Accumulated opacity at which compositing stops
pub const DEFAULT_ERT_THRESHOLD: f32 = 0.95;
/// Upper bound on samples taken along one ray
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;
/// Offset past the entry point, so the boundary face is not sampled
pub const DEFAULT_ENTRY_EPSILON: f32 = 1e-6;

/// How samples along a ray are reduced into one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Front-to-back alpha compositing
    #[default]
    Composite,
    /// Sample with the highest opacity
    MaximumIntensity,
}

/// Where rays start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RayOrigin {
    /// At the camera eye, directions rotated into world space
    #[default]
    Camera,
    /// At the world origin looking down -Z, camera transform ignored.
    /// Pair with [`BoxPlacement::DepthOffset`] to keep the volume in front of the rays.
    Fixed,
}

/// Where the volume's bounding box sits in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BoxPlacement {
    /// Centered on the world origin
    #[default]
    Centered,
    /// Centered in X and Y, near face at `z = -offset`
    DepthOffset(f32),
}

/// Frame-constant render parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub resolution: Vector2<usize>,
    pub projection: ProjectionMode,
    pub view_mode: ViewMode,
    /// Multiplies every sample's opacity
    pub alpha_scale: f32,
    /// Physical voxel size, `None` takes the volume's own scale
    pub voxel_size: Option<Vector3<f32>>,
    pub window: DensityWindow,
    pub ray_origin: RayOrigin,
    pub placement: BoxPlacement,
    /// Early ray termination threshold, `None` disables it
    pub ert_threshold: Option<f32>,
    pub max_iterations: usize,
    pub entry_epsilon: f32,
    /// Step length as a fraction of the reference step
    pub step_scale: f32,
    /// Only trace pixels covered by the projected bounding box
    pub viewport_culling: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            resolution: vector![512, 512],
            projection: ProjectionMode::default(),
            view_mode: ViewMode::default(),
            alpha_scale: 1.0,
            voxel_size: None,
            window: DensityWindow::default(),
            ray_origin: RayOrigin::default(),
            placement: BoxPlacement::default(),
            ert_threshold: Some(DEFAULT_ERT_THRESHOLD),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            entry_epsilon: DEFAULT_ENTRY_EPSILON,
            step_scale: 1.0,
            viewport_culling: true,
        }
    }
}

impl RenderOptions {
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::new()
    }

    /// Check preconditions the render core assumes.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(VolrayError::InvalidOptions(msg));

        if self.resolution.x == 0 || self.resolution.y == 0 {
            return invalid(format!("Resolution must be positive, got {:?}", self.resolution));
        }
        if !self.alpha_scale.is_finite() || self.alpha_scale < 0.0 {
            return invalid(format!(
                "Alpha scale must be finite and non-negative, got {}",
                self.alpha_scale
            ));
        }
        if let Some(size) = self.voxel_size {
            if size.iter().any(|&v| !v.is_finite() || v <= 0.0) {
                return invalid(format!("Voxel size must be positive, got {size:?}"));
            }
        }
        if !self.window.is_valid() {
            return invalid(format!(
                "Density window is inverted: [{}, {}]",
                self.window.min_val, self.window.max_val
            ));
        }
        if let Some(threshold) = self.ert_threshold {
            if !(threshold > 0.0 && threshold <= 1.0) {
                return invalid(format!(
                    "Termination threshold must be in (0, 1], got {threshold}"
                ));
            }
        }
        if self.max_iterations == 0 {
            return invalid("Iteration cap must be positive".into());
        }
        if !self.entry_epsilon.is_finite() || self.entry_epsilon < 0.0 {
            return invalid(format!(
                "Entry epsilon must be non-negative, got {}",
                self.entry_epsilon
            ));
        }
        if !self.step_scale.is_finite() || self.step_scale <= 0.0 {
            return invalid(format!("Step scale must be positive, got {}", self.step_scale));
        }
        if let BoxPlacement::DepthOffset(offset) = self.placement {
            if !offset.is_finite() {
                return invalid(format!("Depth offset must be finite, got {offset}"));
            }
        }
        Ok(())
    }
}

/// Builder for [`RenderOptions`], starting from the defaults.
#[derive(Debug, Clone, Default)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolution(mut self, resolution: Vector2<usize>) -> Self {
        self.options.resolution = resolution;
        self
    }

    pub fn projection(mut self, projection: ProjectionMode) -> Self {
        self.options.projection = projection;
        self
    }

    pub fn mip(self, enabled: bool) -> Self {
        self.projection(if enabled {
            ProjectionMode::MaximumIntensity
        } else {
            ProjectionMode::Composite
        })
    }

    pub fn view_mode(mut self, view_mode: ViewMode) -> Self {
        self.options.view_mode = view_mode;
        self
    }

    pub fn alpha_scale(mut self, alpha_scale: f32) -> Self {
        self.options.alpha_scale = alpha_scale;
        self
    }

    pub fn voxel_size(mut self, voxel_size: Vector3<f32>) -> Self {
        self.options.voxel_size = Some(voxel_size);
        self
    }

    pub fn window(mut self, window: DensityWindow) -> Self {
        self.options.window = window;
        self
    }

    pub fn ray_origin(mut self, ray_origin: RayOrigin) -> Self {
        self.options.ray_origin = ray_origin;
        self
    }

    pub fn placement(mut self, placement: BoxPlacement) -> Self {
        self.options.placement = placement;
        self
    }

    /// Fixed ray origin with the box pushed `offset` units down -Z.
    pub fn fixed_origin(self, offset: f32) -> Self {
        self.ray_origin(RayOrigin::Fixed)
            .placement(BoxPlacement::DepthOffset(offset))
    }

    pub fn ert_threshold(mut self, threshold: Option<f32>) -> Self {
        self.options.ert_threshold = threshold;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.options.max_iterations = max_iterations;
        self
    }

    pub fn entry_epsilon(mut self, epsilon: f32) -> Self {
        self.options.entry_epsilon = epsilon;
        self
    }

    pub fn step_scale(mut self, step_scale: f32) -> Self {
        self.options.step_scale = step_scale;
        self
    }

    pub fn viewport_culling(mut self, enabled: bool) -> Self {
        self.options.viewport_culling = enabled;
        self
    }

    /// Validated options.
    pub fn build(self) -> Result<RenderOptions> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Options as set, no validation.
    pub fn build_unchecked(self) -> RenderOptions {
        self.options
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn defaults() {
        let opts = RenderOptions::builder().build().unwrap();

        assert_eq!(opts.projection, ProjectionMode::Composite);
        assert_eq!(opts.view_mode, ViewMode::Default);
        assert_eq!(opts.ert_threshold, Some(0.95));
        assert_eq!(opts.max_iterations, 10_000);
        assert_eq!(opts.window, DensityWindow::new(0, 255));
        assert_eq!(opts.placement, BoxPlacement::Centered);
        assert_eq!(opts.ray_origin, RayOrigin::Camera);
    }

    #[test]
    fn fixed_origin_sets_both_policies() {
        let opts = RenderOptions::builder()
            .fixed_origin(DEFAULT_DEPTH_OFFSET)
            .build()
            .unwrap();

        assert_eq!(opts.ray_origin, RayOrigin::Fixed);
        assert_eq!(opts.placement, BoxPlacement::DepthOffset(2.0));
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            RenderOptions::builder().resolution(vector![0, 10]),
            RenderOptions::builder().alpha_scale(-1.0),
            RenderOptions::builder().alpha_scale(f32::NAN),
            RenderOptions::builder().window(DensityWindow::new(200, 100)),
            RenderOptions::builder().ert_threshold(Some(0.0)),
            RenderOptions::builder().ert_threshold(Some(1.5)),
            RenderOptions::builder().max_iterations(0),
            RenderOptions::builder().step_scale(0.0),
            RenderOptions::builder().voxel_size(vector![1.0, 0.0, 1.0]),
            RenderOptions::builder().placement(BoxPlacement::DepthOffset(f32::INFINITY)),
        ];

        for builder in cases {
            let res = builder.build();
            assert!(
                matches!(res, Err(VolrayError::InvalidOptions(_))),
                "accepted {res:?}"
            );
        }
    }

    #[test]
    fn unchecked_keeps_values() {
        let opts = RenderOptions::builder().step_scale(0.0).build_unchecked();

        assert_eq!(opts.step_scale, 0.0);
    }
}
