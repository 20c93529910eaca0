mod histogram;
mod linear_volume;
mod parse;
mod pvm;
mod vol_builder;
mod vol_reader;
mod volume;

pub use histogram::{Histogram, HISTOGRAM_BINS};
pub use linear_volume::LinearVolume;
pub use parse::RawInfo;
pub use pvm::{from_pvm_file, PvmFile};
pub use vol_builder::{BuildVolume, DataSource, SampleFormat, VolumeMetadata};
pub use vol_reader::{
    from_data_source, from_raw_file, from_raw_file_or, inf_path, read_or_create_info,
};
pub use volume::Volume;

use crate::render::DensityWindow;

/// Density window used when none is configured.
///
/// 8-bit data uses the full `[0, 255]` range, wider data the dataset's own range.
pub fn default_window<V>(volume: &V, format: SampleFormat) -> DensityWindow
where
    V: Volume + ?Sized,
{
    match format {
        SampleFormat::U8 => DensityWindow::new(0, 255),
        SampleFormat::U16 => {
            let range = volume.get_range();
            if range.is_empty() {
                return DensityWindow::new(0, 0);
            }
            DensityWindow::new(range.low.floor() as u32, range.high.ceil() as u32)
        }
    }
}
