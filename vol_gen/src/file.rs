use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use byteorder::{LittleEndian, WriteBytesExt};
use volray::volumetric::{inf_path, RawInfo, SampleFormat};

use crate::config::Config;

/// Write samples (x fastest) in the configured width.
pub fn write_samples<W>(writer: &mut W, samples: &[u16], format: SampleFormat) -> std::io::Result<()>
where
    W: Write,
{
    match format {
        SampleFormat::U8 => {
            for &sample in samples {
                // Range checked when building config
                writer.write_u8(sample.min(u8::MAX as u16) as u8)?;
            }
        }
        SampleFormat::U16 => {
            for &sample in samples {
                writer.write_u16::<LittleEndian>(sample)?;
            }
        }
    }
    Ok(())
}

/// Write the raw file and its `.inf` sidecar.
pub fn write_volume(config: &Config, samples: &[u16]) -> std::io::Result<()> {
    let path = Path::new(&config.file_name);

    let mut writer = BufWriter::new(File::create(path)?);
    write_samples(&mut writer, samples, config.format)?;
    writer.flush()?;

    let info = RawInfo::new(config.dims.map(|d| d as usize), config.spacing);
    std::fs::write(inf_path(path), info.to_string())
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn sample_widths() {
        let samples = [1, 258, 65535];

        let mut narrow = vec![];
        write_samples(&mut narrow, &samples[..1], SampleFormat::U8).unwrap();
        assert_eq!(narrow, vec![1]);

        let mut wide = vec![];
        write_samples(&mut wide, &samples, SampleFormat::U16).unwrap();
        assert_eq!(wide, vec![1, 0, 2, 1, 255, 255]);
    }
}
