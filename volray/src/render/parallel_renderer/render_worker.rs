use crossbeam::channel::Receiver;
use log::trace;
use parking_lot::Mutex;

use crate::{
    render::{renderer::Frame, Image},
    volumetric::Volume,
};

use super::messages::RenderTask;

/// Renders tiles from the task queue into the shared image.
///
/// Tiles never overlap, so the lock is only held while copying a finished tile.
pub struct RenderWorker<'a, 'img, V>
where
    V: Volume + ?Sized,
{
    renderer_id: usize,
    frame: &'a Frame<'a, V>,
    task_rec: Receiver<RenderTask>,
    canvas: &'a Mutex<&'img mut Image>,
}

impl<'a, 'img, V> RenderWorker<'a, 'img, V>
where
    V: Volume + ?Sized,
{
    pub fn new(
        renderer_id: usize,
        frame: &'a Frame<'a, V>,
        task_rec: Receiver<RenderTask>,
        canvas: &'a Mutex<&'img mut Image>,
    ) -> Self {
        Self {
            renderer_id,
            frame,
            task_rec,
            canvas,
        }
    }

    /// Main loop, runs until the queue is drained and closed.
    /// Returns the number of tiles rendered.
    pub fn run(&self) -> usize {
        let mut rendered = 0;

        for task in self.task_rec.iter() {
            let colors = self.frame.render_tile(&task.pixels);

            self.canvas.lock().copy_tile(&task.pixels, &colors);

            trace!(
                "Render {}: tile {} done ({:?} x {:?})",
                self.renderer_id,
                task.tile_id,
                task.pixels.x,
                task.pixels.y
            );
            rendered += 1;
        }

        rendered
    }
}
