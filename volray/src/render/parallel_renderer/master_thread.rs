use std::panic;

use crossbeam::channel;
use log::debug;
use parking_lot::Mutex;

use crate::{
    camera::CameraFrame,
    render::{Image, RenderOptions, Renderer},
    volumetric::Volume,
    Result,
};

use super::{messages::RenderTask, render_worker::RenderWorker};

/// Side of the square tiles work is split into
pub const TILE_SIDE: usize = 16;

/// Renderer splitting each frame into tiles rendered by a pool of worker threads.
///
/// Produces the same image as [`Renderer`], pixel for pixel.
pub struct ParallelRenderer<V>
where
    V: Volume + Sync,
{
    renderer: Renderer<V>,
    worker_count: usize,
}

impl<V> ParallelRenderer<V>
where
    V: Volume + Sync,
{
    /// One worker per available core.
    pub fn new(volume: V, render_options: RenderOptions) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::with_workers(volume, render_options, workers)
    }

    pub fn with_workers(volume: V, render_options: RenderOptions, worker_count: usize) -> Self {
        Self {
            renderer: Renderer::new(volume, render_options),
            worker_count: worker_count.max(1),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn renderer(&self) -> &Renderer<V> {
        &self.renderer
    }

    pub fn set_render_options(&mut self, opts: RenderOptions) {
        self.renderer.set_render_options(opts);
    }

    /// Render the whole `image`.
    ///
    /// Fails only if worker threads cannot be spawned. A panicking worker
    /// panics the caller.
    pub fn render(&self, camera: &CameraFrame, image: &mut Image) -> Result<()> {
        let frame = self.renderer.begin_frame(camera, image.resolution());
        image.clear();

        let pixels = frame.covered_pixels();

        let (task_sen, task_rec) = channel::unbounded();
        let mut tile_count = 0;
        for (tile_id, tile) in pixels.tiles(TILE_SIDE).enumerate() {
            if task_sen.send(RenderTask::new(tile_id, tile)).is_err() {
                break;
            }
            tile_count += 1;
        }
        // Workers stop once the queue is drained
        drop(task_sen);

        debug!(
            "Rendering {} tiles ({} pixels) on {} workers",
            tile_count,
            pixels.items(),
            self.worker_count
        );

        let canvas = Mutex::new(image);
        let frame = &frame;
        let canvas = &canvas;

        let scoped = crossbeam::scope(|s| -> Result<usize> {
            let mut handles = Vec::with_capacity(self.worker_count);

            for id in 0..self.worker_count {
                let task_rec = task_rec.clone();
                let handle = s
                    .builder()
                    .name(format!("Ren{id}"))
                    .spawn(move |_| RenderWorker::new(id, frame, task_rec, canvas).run())?;
                handles.push(handle);
            }

            let mut rendered = 0;
            for handle in handles {
                match handle.join() {
                    Ok(n) => rendered += n,
                    Err(payload) => panic::resume_unwind(payload),
                }
            }
            Ok(rendered)
        });

        let rendered = match scoped {
            Ok(res) => res?,
            Err(payload) => panic::resume_unwind(payload),
        };
        debug!("Frame done, {rendered} tiles rendered");

        Ok(())
    }

    /// Render a new image at the configured resolution.
    pub fn render_image(&self, camera: &CameraFrame) -> Result<Image> {
        let mut image = Image::new(self.renderer.render_options().resolution);
        self.render(camera, &mut image)?;
        Ok(image)
    }
}

#[cfg(test)]
mod test {

    use nalgebra::{vector, Matrix4, Point3};

    use super::*;
    use crate::{
        camera::{Camera, OrbitCamera},
        common::ViewMode,
        render::ProjectionMode,
        test_helpers::*,
    };

    fn options(mip: bool, culling: bool) -> RenderOptions {
        RenderOptions::builder()
            .resolution(vector![37, 21])
            .mip(mip)
            .alpha_scale(0.4)
            .viewport_culling(culling)
            .build()
            .unwrap()
    }

    #[test]
    fn matches_single_threaded() {
        let mut orbit = OrbitCamera::new(45.0);
        orbit.set_orientation(0.0, 0.3, 0.8);
        let camera = orbit.frame();

        for mip in [false, true] {
            for culling in [false, true] {
                let serial = Renderer::new(ball_volume(10), options(mip, culling));
                let expected = serial.render_image(&camera);

                for workers in [1, 3, 8] {
                    let parallel =
                        ParallelRenderer::with_workers(ball_volume(10), options(mip, culling), workers);
                    let image = parallel.render_image(&camera).unwrap();
                    assert_eq!(image, expected, "mip {mip} culling {culling} workers {workers}");
                }
            }
        }
    }

    #[test]
    fn matches_in_every_view_mode() {
        let camera = CameraFrame::looking_down_z(2.5, 1.3);

        for mode in ViewMode::ALL {
            let opts = RenderOptions::builder()
                .resolution(vector![50, 40])
                .view_mode(mode)
                .projection(ProjectionMode::Composite)
                .build()
                .unwrap();
            let serial = Renderer::new(ball_volume(9), opts.clone());
            let parallel = ParallelRenderer::with_workers(ball_volume(9), opts, 4);

            assert_eq!(parallel.render_image(&camera).unwrap(), serial.render_image(&camera));
        }
    }

    #[test]
    fn volume_out_of_view() {
        // Shifted far to the side, still looking down -Z
        let eye = vector![10.0, 0.0, 5.0];
        let camera = CameraFrame::new(Matrix4::new_translation(&eye), Point3::from(eye), 1.0);
        let parallel = ParallelRenderer::with_workers(ball_volume(8), options(false, true), 2);

        let frame = parallel.renderer().begin_frame(&camera, vector![37, 21]);
        assert_eq!(frame.covered_pixels().items(), 0);

        let image = parallel.render_image(&camera).unwrap();
        assert_eq!(image, Image::new(vector![37, 21]));
    }

    #[test]
    fn at_least_one_worker() {
        let parallel = ParallelRenderer::with_workers(ball_volume(4), options(false, true), 0);

        assert_eq!(parallel.worker_count(), 1);
        assert!(ParallelRenderer::new(ball_volume(4), options(false, true)).worker_count() >= 1);
    }
}
