use log::debug;
use nalgebra::Vector2;

use crate::{
    camera::CameraFrame,
    color::{self, RGBA},
    common::{PixelBox, Ray, ViewportBox},
    volumetric::Volume,
};

use super::{
    generate_ray, march, project_to_viewport, Image, MarchOutcome, MarchSettings, RayOrigin,
    RenderOptions, VolumePlacement,
};

/// Single threaded renderer.
pub struct Renderer<V>
where
    V: Volume,
{
    volume: V,
    render_options: RenderOptions,
}

impl<V> Renderer<V>
where
    V: Volume,
{
    pub fn new(volume: V, render_options: RenderOptions) -> Renderer<V> {
        Renderer {
            volume,
            render_options,
        }
    }

    pub fn volume(&self) -> &V {
        &self.volume
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    pub fn set_render_options(&mut self, opts: RenderOptions) {
        self.render_options = opts;
    }

    pub fn set_render_resolution(&mut self, res: Vector2<usize>) {
        self.render_options.resolution = res;
    }

    /// Placement of the volume under the current options.
    pub fn placement(&self) -> VolumePlacement {
        let voxel_size = self
            .render_options
            .voxel_size
            .unwrap_or_else(|| self.volume.get_scale());

        VolumePlacement::new(
            self.volume.get_size(),
            voxel_size,
            self.render_options.view_mode,
            self.render_options.placement,
        )
    }

    /// Everything constant during one frame of `resolution` pixels.
    pub fn begin_frame(&self, camera: &CameraFrame, resolution: Vector2<usize>) -> Frame<'_, V> {
        let placement = self.placement();
        let settings = MarchSettings::new(&self.render_options, &placement);

        Frame {
            volume: &self.volume,
            camera: *camera,
            resolution,
            ray_origin: self.render_options.ray_origin,
            viewport_culling: self.render_options.viewport_culling,
            placement,
            settings,
        }
    }

    /// Render the whole `image`.
    /// Resolution is taken from the image, pixels not covered by the volume are transparent.
    pub fn render(&self, camera: &CameraFrame, image: &mut Image) {
        let frame = self.begin_frame(camera, image.resolution());
        image.clear();

        let pixels = frame.covered_pixels();
        debug!(
            "Rendering {}x{} | {} of {} pixels covered",
            image.width(),
            image.height(),
            pixels.items(),
            image.width() * image.height()
        );

        for y in pixels.y.clone() {
            for x in pixels.x.clone() {
                image.set(x, y, frame.trace(x, y));
            }
        }
    }

    /// Render a new image at the configured resolution.
    pub fn render_image(&self, camera: &CameraFrame) -> Image {
        let mut image = Image::new(self.render_options.resolution);
        self.render(camera, &mut image);
        image
    }

    /// Render one pixel of `image`.
    /// Out of bounds coordinates are skipped, returns whether the pixel was written.
    pub fn render_pixel(&self, camera: &CameraFrame, image: &mut Image, x: usize, y: usize) -> bool {
        if x >= image.width() || y >= image.height() {
            return false;
        }
        let frame = self.begin_frame(camera, image.resolution());
        image.set(x, y, frame.trace(x, y))
    }
}

/// One frame of a renderer: camera, placement and marching settings, shared by all pixels.
/// Every pixel is a pure function of this state.
pub struct Frame<'a, V>
where
    V: Volume + ?Sized,
{
    volume: &'a V,
    camera: CameraFrame,
    resolution: Vector2<usize>,
    ray_origin: RayOrigin,
    viewport_culling: bool,
    placement: VolumePlacement,
    settings: MarchSettings,
}

impl<'a, V> Frame<'a, V>
where
    V: Volume + ?Sized,
{
    pub fn placement(&self) -> &VolumePlacement {
        &self.placement
    }

    pub fn settings(&self) -> &MarchSettings {
        &self.settings
    }

    pub fn resolution(&self) -> Vector2<usize> {
        self.resolution
    }

    pub fn ray(&self, x: usize, y: usize) -> Ray {
        generate_ray(x, y, self.resolution, &self.camera, self.ray_origin)
    }

    /// March the ray of pixel `(x, y)`, `None` if it misses the volume.
    pub fn march_pixel(&self, x: usize, y: usize) -> Option<MarchOutcome> {
        let ray = self.ray(x, y);
        let (t_min, _) = self.placement.bound_box().intersect(&ray)?;
        Some(march(
            self.volume,
            &self.placement,
            &ray,
            t_min,
            &self.settings,
        ))
    }

    /// Color of pixel `(x, y)`, transparent black on a miss.
    pub fn trace(&self, x: usize, y: usize) -> RGBA {
        match self.march_pixel(x, y) {
            Some(outcome) => outcome.color,
            None => color::zero(),
        }
    }

    /// Colors of a tile, row by row.
    pub fn render_tile(&self, tile: &PixelBox) -> Vec<RGBA> {
        let mut colors = Vec::with_capacity(tile.items());
        for y in tile.y.clone() {
            for x in tile.x.clone() {
                colors.push(self.trace(x, y));
            }
        }
        colors
    }

    /// Pixels whose rays can hit the volume.
    ///
    /// With culling enabled the eight box corners are projected onto the image;
    /// if any corner is at or behind the eye the whole image is returned.
    pub fn covered_pixels(&self) -> PixelBox {
        let full = PixelBox::full(self.resolution);
        if !self.viewport_culling {
            return full;
        }

        let mut viewport = ViewportBox::new();
        for corner in self.placement.bound_box() {
            let in_camera = match self.ray_origin {
                RayOrigin::Camera => match self.camera.to_camera_space(&corner) {
                    Some(p) => p,
                    None => return full,
                },
                // Fixed rays are not transformed
                RayOrigin::Fixed => corner,
            };

            match project_to_viewport(in_camera, self.resolution, self.camera.view_plane_dist) {
                Some(p) => viewport.add_point(p.x, p.y),
                None => return full,
            }
        }

        viewport.get_pixel_range(self.resolution)
    }
}
