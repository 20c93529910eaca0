use std::{fs::File, path::Path, str::FromStr};

use memmap::{Mmap, MmapOptions};
use nalgebra::Vector3;
use nom::{multi::count, number::complete::le_u16, IResult};

use crate::{Result, VolrayError};

pub trait BuildVolume
where
    Self: Sized,
{
    fn build(metadata: VolumeMetadata) -> Result<Self>;
}

/// Width of one stored sample.
/// 16-bit samples are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat {
    #[default]
    U8,
    U16,
}

impl SampleFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::U16 => 2,
        }
    }

    /// Largest representable sample
    pub fn max_value(self) -> f32 {
        match self {
            SampleFormat::U8 => u8::MAX as f32,
            SampleFormat::U16 => u16::MAX as f32,
        }
    }

    /// Decode exactly `n_samples` samples from the start of `bytes`.
    /// Trailing bytes are ignored.
    pub fn decode(self, bytes: &[u8], n_samples: usize) -> Result<Vec<f32>> {
        let needed = n_samples
            .checked_mul(self.bytes_per_sample())
            .ok_or_else(|| {
                VolrayError::InvalidData(format!("{n_samples} samples do not fit in memory"))
            })?;
        if bytes.len() < needed {
            return Err(VolrayError::InvalidData(format!(
                "Expected {needed} bytes of samples, got {}",
                bytes.len()
            )));
        }

        let samples = match self {
            SampleFormat::U8 => bytes[..needed].iter().map(|&v| v.into()).collect(),
            SampleFormat::U16 => {
                let parsed: IResult<&[u8], Vec<u16>> = count(le_u16, n_samples)(&bytes[..needed]);
                let (_, values) =
                    parsed.map_err(|e| VolrayError::Parse(format!("16-bit samples: {e}")))?;
                values.into_iter().map(|v| v.into()).collect()
            }
        };
        Ok(samples)
    }
}

impl FromStr for SampleFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "8" => Ok(SampleFormat::U8),
            "16" => Ok(SampleFormat::U16),
            _ => Err(format!("Unsupported sample width '{s}', use 8 or 16")),
        }
    }
}

/// Bytes backing a volume, owned or memory mapped.
pub enum DataSource {
    Vec(Vec<u8>),
    Mmap(Mmap),
}

impl DataSource {
    pub fn get_slice(&self) -> &[u8] {
        match self {
            DataSource::Vec(v) => v.as_slice(),
            DataSource::Mmap(m) => &m[..],
        }
    }

    pub fn from_vec(vec: Vec<u8>) -> DataSource {
        DataSource::Vec(vec)
    }

    pub fn from_file<P>(path: P) -> Result<DataSource>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(VolrayError::InvalidData(format!(
                "{} does not lead to a file",
                path.display()
            )));
        }

        let file = File::open(path)?;

        // Empty files cannot be mapped
        if file.metadata()?.len() == 0 {
            return Ok(DataSource::Vec(Vec::new()));
        }

        // Safety: the file is only read, mapping lives as long as the DataSource
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        Ok(DataSource::Mmap(mmap))
    }
}

/// Everything needed to build a volume.
pub struct VolumeMetadata {
    pub size: Vector3<usize>,
    pub scale: Vector3<f32>, // shape of voxels
    pub data: DataSource,
    pub format: SampleFormat,
    /// Bytes to skip before the first sample
    pub data_offset: usize,
}
