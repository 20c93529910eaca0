mod master_thread;
mod messages;
mod render_worker;

pub use master_thread::{ParallelRenderer, TILE_SIDE};
