use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{Result, VolrayError};

use super::{
    parse::RawInfo,
    vol_builder::{BuildVolume, DataSource, SampleFormat, VolumeMetadata},
    Volume,
};

/// Path of the `.inf` sidecar: `head.raw` -> `head.raw.inf`.
pub fn inf_path<P>(raw_path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    let mut name: OsString = raw_path.as_ref().as_os_str().to_owned();
    name.push(".inf");
    PathBuf::from(name)
}

/// Load a raw volume described by its `.inf` sidecar.
///
/// The raw file is memory mapped and decoded into the target volume type.
/// Bytes after the last sample are ignored.
pub fn from_raw_file<P, V>(path: P, format: SampleFormat) -> Result<V>
where
    P: AsRef<Path>,
    V: BuildVolume + Volume,
{
    from_raw_file_or(path, format, None)
}

/// Load a raw volume, writing its sidecar from `fallback` when none exists yet.
pub fn from_raw_file_or<P, V>(
    path: P,
    format: SampleFormat,
    fallback: Option<RawInfo>,
) -> Result<V>
where
    P: AsRef<Path>,
    V: BuildVolume + Volume,
{
    let path = path.as_ref();
    let info = read_or_create_info(path, fallback)?;
    let data = DataSource::from_file(path)?;

    from_data_source(info, data, format)
}

/// Read the `.inf` sidecar of `raw_path`.
///
/// When the sidecar is missing and `fallback` is given, the fallback is
/// written next to the raw file and returned.
pub fn read_or_create_info<P>(raw_path: P, fallback: Option<RawInfo>) -> Result<RawInfo>
where
    P: AsRef<Path>,
{
    let inf = inf_path(raw_path);
    match fallback {
        Some(info) if !inf.exists() => {
            info.sample_count().ok_or_else(|| {
                VolrayError::InvalidData(format!(
                    "Dimensions {:?} describe too many samples",
                    info.dims
                ))
            })?;
            info.write_file(&inf)?;
            info!("Wrote {}", inf.display());
            Ok(info)
        }
        _ => RawInfo::from_file(inf),
    }
}

/// Build a volume from already loaded bytes.
pub fn from_data_source<V>(info: RawInfo, data: DataSource, format: SampleFormat) -> Result<V>
where
    V: BuildVolume + Volume,
{
    let expected = info
        .sample_count()
        .and_then(|n| n.checked_mul(format.bytes_per_sample()))
        .ok_or_else(|| {
            VolrayError::InvalidData(format!(
                "Dimensions {:?} describe too many {format:?} samples",
                info.dims
            ))
        })?;
    let actual = data.get_slice().len();

    if actual < expected {
        return Err(VolrayError::InvalidData(format!(
            "Raw data holds {actual} bytes, {expected} needed for {:?} {format:?} samples",
            info.dims
        )));
    }
    if actual > expected {
        warn!("Raw data has {} trailing bytes, ignoring", actual - expected);
    }

    let metadata = VolumeMetadata {
        size: info.dims,
        scale: info.voxel_spacing,
        data,
        format,
        data_offset: 0,
    };

    let volume = V::build(metadata)?;
    info!(
        "Loaded {} {:?}, range {:?}",
        volume.get_name(),
        volume.get_size(),
        volume.get_range()
    );
    Ok(volume)
}
