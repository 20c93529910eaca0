//! PVM volumes.
//!
//! ```text
//! PVM3\n
//! 256 256 128\n      dimensions
//! 1 1 1.5\n          voxel spacing, not present in PVM
//! 1\n                bytes per sample
//! <samples><description>\0<courtesy>\0<parameter>\0<comment>\0
//! ```
//! Plain `PVM` files may carry `#` comment lines before the dimensions and
//! have unit spacing. Only PVM3 has the trailing strings.
//! Two byte samples are stored most significant byte first.
//!
//! The whole file may be wrapped in a DDS container, a delta coded bit stream
//! with an optional byte interleave.

use std::{borrow::Cow, path::Path};

use log::{debug, info, warn};
use nalgebra::{vector, Vector3};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{line_ending, not_line_ending, space0, space1, u64 as parse_u64},
    combinator::{map, value},
    multi::{count, many0},
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::{Result, VolrayError};

use super::{
    parse::RawInfo,
    vol_builder::{BuildVolume, DataSource, SampleFormat},
    vol_reader::from_data_source,
    Volume,
};

const DDS_V1: &[u8] = b"DDS v3d\n";
const DDS_V2: &[u8] = b"DDS v3e\n";

/// Interleave block of version 2 streams
const DDS_INTERLEAVE: usize = 1 << 24;

/// Bits of the run length field, a zero run ends the stream
const RUN_BITS: u32 = 7;

/// Decoded PVM file
#[derive(Debug, Clone, PartialEq)]
pub struct PvmFile {
    pub info: RawInfo,
    pub format: SampleFormat,
    /// Samples, two byte samples already in little endian order
    pub data: Vec<u8>,
    pub description: Option<String>,
    pub courtesy: Option<String>,
    pub parameter: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PvmHeader {
    version: u8,
    dims: Vector3<usize>,
    spacing: Vector3<f32>,
    components: usize,
}

impl PvmFile {
    pub fn from_file<P>(path: P) -> Result<PvmFile>
    where
        P: AsRef<Path>,
    {
        let source = DataSource::from_file(path)?;
        PvmFile::from_bytes(source.get_slice())
    }

    /// Parse a PVM file, DDS wrapped or not.
    pub fn from_bytes(bytes: &[u8]) -> Result<PvmFile> {
        let bytes = unwrap_dds(bytes)?;

        let (body, header) = pvm_header(bytes.as_ref())
            .map_err(|e| VolrayError::Parse(format!("PVM header: {e:?}")))?;
        debug!("PVM header {header:?}");

        let PvmHeader {
            version,
            dims,
            spacing,
            components,
        } = header;

        if dims.iter().any(|&d| d == 0) {
            return Err(VolrayError::InvalidData(format!(
                "Dimensions shouldn't contain any zeroes, got {dims:?}"
            )));
        }
        if spacing.iter().any(|&v| !(v > 0.0)) {
            return Err(VolrayError::InvalidData(format!(
                "Voxel spacing must be positive, got {spacing:?}"
            )));
        }
        let format = match components {
            1 => SampleFormat::U8,
            2 => SampleFormat::U16,
            n => {
                return Err(VolrayError::InvalidData(format!(
                    "{n} bytes per sample not supported"
                )))
            }
        };

        let info = RawInfo::new(dims, spacing);
        let size = info
            .sample_count()
            .and_then(|n| n.checked_mul(components))
            .ok_or_else(|| {
                VolrayError::InvalidData(format!("Dimensions {dims:?} describe too many samples"))
            })?;
        if body.len() < size {
            return Err(VolrayError::InvalidData(format!(
                "PVM holds {} bytes of samples, {size} needed",
                body.len()
            )));
        }
        let (samples, tail) = body.split_at(size);

        let data = match format {
            SampleFormat::U8 => samples.to_vec(),
            SampleFormat::U16 => samples
                .chunks_exact(2)
                .flat_map(|pair| [pair[1], pair[0]])
                .collect(),
        };

        let mut strings = [None, None, None, None];
        let rest = if version == 3 {
            let (rest, parsed) = trailing_strings(tail)
                .map_err(|e| VolrayError::Parse(format!("PVM3 strings: {e:?}")))?;
            for (slot, text) in strings.iter_mut().zip(parsed) {
                if !text.is_empty() {
                    *slot = Some(String::from_utf8_lossy(text).into_owned());
                }
            }
            rest
        } else {
            tail
        };
        if !rest.is_empty() {
            warn!("PVM has {} trailing bytes, ignoring", rest.len());
        }

        let [description, courtesy, parameter, comment] = strings;
        Ok(PvmFile {
            info,
            format,
            data,
            description,
            courtesy,
            parameter,
            comment,
        })
    }

    /// Build the target volume from the decoded samples.
    pub fn build<V>(self) -> Result<V>
    where
        V: BuildVolume + Volume,
    {
        from_data_source(self.info, DataSource::from_vec(self.data), self.format)
    }
}

/// Load a PVM volume. The sample format comes from the file.
pub fn from_pvm_file<P, V>(path: P) -> Result<(V, SampleFormat)>
where
    P: AsRef<Path>,
    V: BuildVolume + Volume,
{
    let pvm = PvmFile::from_file(path)?;
    if let Some(description) = &pvm.description {
        info!("PVM description: {description}");
    }
    let format = pvm.format;
    Ok((pvm.build()?, format))
}

fn rest_of_line(input: &[u8]) -> IResult<&[u8], &[u8]> {
    terminated(not_line_ending, line_ending)(input)
}

fn dims_line(input: &[u8]) -> IResult<&[u8], Vector3<usize>> {
    terminated(
        map(
            tuple((
                preceded(space0, parse_u64),
                preceded(space1, parse_u64),
                preceded(space1, parse_u64),
            )),
            |(x, y, z)| vector![x as usize, y as usize, z as usize],
        ),
        rest_of_line,
    )(input)
}

fn spacing_line(input: &[u8]) -> IResult<&[u8], Vector3<f32>> {
    terminated(
        map(
            tuple((
                preceded(space0, float),
                preceded(space1, float),
                preceded(space1, float),
            )),
            |(x, y, z)| vector![x, y, z],
        ),
        rest_of_line,
    )(input)
}

fn components_line(input: &[u8]) -> IResult<&[u8], usize> {
    terminated(map(preceded(space0, parse_u64), |c| c as usize), rest_of_line)(input)
}

fn pvm_header(input: &[u8]) -> IResult<&[u8], PvmHeader> {
    alt((
        map(
            tuple((
                tag("PVM\n"),
                many0(preceded(tag("#"), rest_of_line)),
                dims_line,
                components_line,
            )),
            |(_, _, dims, components)| PvmHeader {
                version: 1,
                dims,
                spacing: vector![1.0, 1.0, 1.0],
                components,
            },
        ),
        map(
            tuple((
                alt((value(2, tag("PVM2\n")), value(3, tag("PVM3\n")))),
                dims_line,
                spacing_line,
                components_line,
            )),
            |(version, dims, spacing, components)| PvmHeader {
                version,
                dims,
                spacing,
                components,
            },
        ),
    ))(input)
}

/// Description, courtesy, parameter and comment, each NUL terminated
fn trailing_strings(input: &[u8]) -> IResult<&[u8], Vec<&[u8]>> {
    count(terminated(take_until("\0"), tag("\0")), 4)(input)
}

/// Strip the DDS container if present.
fn unwrap_dds(bytes: &[u8]) -> Result<Cow<'_, [u8]>> {
    if let Some(stream) = bytes.strip_prefix(DDS_V1) {
        Ok(Cow::Owned(dds_decode(stream, 0)?))
    } else if let Some(stream) = bytes.strip_prefix(DDS_V2) {
        Ok(Cow::Owned(dds_decode(stream, DDS_INTERLEAVE)?))
    } else {
        Ok(Cow::Borrowed(bytes))
    }
}

/// Most significant bit first, zeroes past the end.
struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn read(&mut self, bits: u32) -> u32 {
        let mut v = 0;
        for _ in 0..bits {
            let bit = self
                .bytes
                .get(self.pos / 8)
                .map_or(0, |byte| (byte >> (7 - self.pos % 8)) & 1);
            v = (v << 1) | bit as u32;
            self.pos += 1;
        }
        v
    }
}

/// Width of the deltas of one run
fn delta_width(code: u32) -> u32 {
    if code >= 1 {
        code + 1
    } else {
        code
    }
}

/// Decode a DDS stream.
///
/// Header is the interleave stride (2 bits, plus one) and the row length used
/// for prediction (16 bits, plus one). Then runs follow, each a 7 bit count,
/// a 3 bit delta width code and the biased deltas.
fn dds_decode(stream: &[u8], block: usize) -> Result<Vec<u8>> {
    let mut bits = BitReader::new(stream);
    let skip = bits.read(2) as usize + 1;
    let strip = bits.read(16) as usize + 1;

    let mut out: Vec<u8> = Vec::new();
    let mut act: i32 = 0;

    loop {
        let run = bits.read(RUN_BITS);
        if run == 0 {
            break;
        }
        let width = delta_width(bits.read(3));

        for _ in 0..run {
            let delta = bits.read(width) as i32 - (1 << width) / 2;
            let n = out.len();
            act += if strip == 1 || n <= strip {
                delta
            } else {
                out[n - strip] as i32 - out[n - strip - 1] as i32 + delta
            };
            act = act.rem_euclid(256);
            out.push(act as u8);
        }
    }

    if out.is_empty() {
        return Err(VolrayError::InvalidData("Empty DDS stream".into()));
    }
    debug!("DDS stream decoded to {} bytes, skip {skip} strip {strip}", out.len());

    Ok(restore_interleave(&out, skip, block))
}

/// Undo the byte interleave of a DDS stream, blockwise when `block` is not zero.
fn restore_interleave(data: &[u8], skip: usize, block: usize) -> Vec<u8> {
    if skip <= 1 || data.is_empty() {
        return data.to_vec();
    }

    let chunk_len = if block == 0 {
        data.len()
    } else {
        skip * block
    };

    let mut out = vec![0; data.len()];
    for (src, dst) in data.chunks(chunk_len).zip(out.chunks_mut(chunk_len)) {
        let mut src = src.iter();
        for i in 0..skip {
            for j in (i..dst.len()).step_by(skip) {
                if let Some(&b) = src.next() {
                    dst[j] = b;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::volumetric::LinearVolume;

    #[derive(Default)]
    struct BitWriter {
        bytes: Vec<u8>,
        bits: usize,
    }

    impl BitWriter {
        fn write(&mut self, v: u32, width: u32) {
            for i in (0..width).rev() {
                if self.bits % 8 == 0 {
                    self.bytes.push(0);
                }
                let bit = ((v >> i) & 1) as u8;
                if let Some(last) = self.bytes.last_mut() {
                    *last |= bit << (7 - self.bits % 8);
                }
                self.bits += 1;
            }
        }
    }

    /// Plain 8 bit deltas, no interleave or row prediction
    fn dds_wrap(header: &[u8], data: &[u8]) -> Vec<u8> {
        let mut w = BitWriter::default();
        w.write(0, 2);
        w.write(0, 16);
        let mut prev = 0i32;
        for run in data.chunks(127) {
            w.write(run.len() as u32, RUN_BITS);
            w.write(7, 3);
            for &b in run {
                w.write((b as i32 - prev + 128).rem_euclid(256) as u32, 8);
                prev = b as i32;
            }
        }
        w.write(0, RUN_BITS);

        let mut out = header.to_vec();
        out.extend(w.bytes);
        out
    }

    #[test]
    fn bits_msb_first() {
        let mut bits = BitReader::new(&[0b1010_0000, 0xff]);

        assert_eq!(bits.read(3), 0b101);
        assert_eq!(bits.read(0), 0);
        assert_eq!(bits.read(9), 0b0_0000_1111);
        assert_eq!(bits.read(4), 0b1111);
        assert_eq!(bits.read(8), 0);
    }

    #[test]
    fn dds_deltas() {
        let mut w = BitWriter::default();
        w.write(0, 2);
        w.write(0, 16);
        w.write(3, RUN_BITS);
        // width 5, bias 16
        w.write(4, 3);
        for encoded in [26, 18, 15] {
            w.write(encoded, 5);
        }

        assert_eq!(dds_decode(&w.bytes, 0).unwrap(), vec![10, 12, 11]);
    }

    #[test]
    fn dds_row_prediction() {
        let mut w = BitWriter::default();
        w.write(0, 2);
        // rows of two
        w.write(1, 16);
        w.write(4, RUN_BITS);
        // width 4, bias 8
        w.write(3, 3);
        for encoded in [13, 11, 10, 8] {
            w.write(encoded, 4);
        }
        w.write(0, RUN_BITS);

        // last one predicted from the step between the first two
        assert_eq!(dds_decode(&w.bytes, 0).unwrap(), vec![5, 8, 10, 13]);
    }

    #[test]
    fn dds_empty_stream_rejected() {
        assert!(matches!(
            dds_decode(&[0, 0, 0, 0], 0),
            Err(VolrayError::InvalidData(_))
        ));
    }

    #[test]
    fn interleave_restored() {
        assert_eq!(restore_interleave(&[1, 3, 5, 2, 4], 2, 0), vec![1, 2, 3, 4, 5]);
        assert_eq!(
            restore_interleave(&[1, 3, 2, 4, 5, 7, 6, 8, 9], 2, 2),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9]
        );
        assert_eq!(restore_interleave(&[4, 5, 6], 1, 0), vec![4, 5, 6]);
    }

    #[test]
    fn pvm1_with_comments() {
        let mut bytes = b"PVM\n# scanned\n#  twice\n2 2 1\n1\n".to_vec();
        bytes.extend([1, 2, 3, 4]);

        let pvm = PvmFile::from_bytes(&bytes).unwrap();

        assert_eq!(pvm.info, RawInfo::new(vector![2, 2, 1], vector![1.0, 1.0, 1.0]));
        assert_eq!(pvm.format, SampleFormat::U8);
        assert_eq!(pvm.data, vec![1, 2, 3, 4]);
        assert_eq!(pvm.description, None);
    }

    #[test]
    fn pvm2_sixteen_bit_big_endian() {
        let mut bytes = b"PVM2\n2 1 1\n0.5 0.5 2\n2\n".to_vec();
        bytes.extend([0x01, 0x00, 0xff, 0xfe]);

        let pvm = PvmFile::from_bytes(&bytes).unwrap();
        assert_eq!(pvm.info.voxel_spacing, vector![0.5, 0.5, 2.0]);
        assert_eq!(pvm.format, SampleFormat::U16);

        let volume: LinearVolume = pvm.build().unwrap();
        assert_eq!(volume.get_data(0, 0, 0), Some(256.0));
        assert_eq!(volume.get_data(1, 0, 0), Some(65534.0));
    }

    #[test]
    fn pvm3_strings() {
        let mut bytes = b"PVM3\n1 1 2\n1 1 1\n1\n".to_vec();
        bytes.extend([9, 8]);
        bytes.extend(b"Engine block\0CT scan\0\0\0");

        let pvm = PvmFile::from_bytes(&bytes).unwrap();

        assert_eq!(pvm.data, vec![9, 8]);
        assert_eq!(pvm.description.as_deref(), Some("Engine block"));
        assert_eq!(pvm.courtesy.as_deref(), Some("CT scan"));
        assert_eq!(pvm.parameter, None);
        assert_eq!(pvm.comment, None);
    }

    #[test]
    fn dds_wrapped_pvm() {
        let mut plain = b"PVM2\n3 1 1\n1 1 1\n1\n".to_vec();
        plain.extend([7, 200, 9]);

        for header in [DDS_V1, DDS_V2] {
            let pvm = PvmFile::from_bytes(&dds_wrap(header, &plain)).unwrap();

            assert_eq!(pvm.info.dims, vector![3, 1, 1]);
            assert_eq!(pvm.data, vec![7, 200, 9]);
        }
    }

    #[test]
    fn bad_files_rejected() {
        let short = b"PVM2\n4 4 4\n1 1 1\n1\nabc".to_vec();
        assert!(matches!(
            PvmFile::from_bytes(&short),
            Err(VolrayError::InvalidData(_))
        ));

        let components = b"PVM2\n1 1 1\n1 1 1\n3\nabc".to_vec();
        assert!(PvmFile::from_bytes(&components).is_err());

        let zero = b"PVM\n0 1 1\n1\n".to_vec();
        assert!(PvmFile::from_bytes(&zero).is_err());

        let huge = b"PVM\n4194304 4194304 4194304\n1\n".to_vec();
        assert!(matches!(
            PvmFile::from_bytes(&huge),
            Err(VolrayError::InvalidData(_))
        ));

        assert!(matches!(
            PvmFile::from_bytes(b"RAW\n1 1 1\n"),
            Err(VolrayError::Parse(_))
        ));

        let unterminated = b"PVM3\n1 1 1\n1 1 1\n1\n\x05no nul".to_vec();
        assert!(PvmFile::from_bytes(&unterminated).is_err());
    }
}
