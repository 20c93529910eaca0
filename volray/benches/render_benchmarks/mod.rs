//! Benchmark categories by renderer

pub mod multi_thread;
pub mod single_thread;
