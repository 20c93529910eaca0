use crate::common::PixelBox;

/// Tile handed to a render worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTask {
    pub tile_id: usize,
    pub pixels: PixelBox,
}

impl RenderTask {
    pub fn new(tile_id: usize, pixels: PixelBox) -> Self {
        Self { tile_id, pixels }
    }
}
