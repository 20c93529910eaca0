//! `.raw.inf` sidecar files describing raw volumes.
//!
//! ```text
//! #dimensions
//! 256 256 128
//!
//! #voxel-spacing
//! 1 1 1.5
//! ```
//! Sections may come in any order, separated by blank lines.
//! `#aspect-ratio` is accepted as an older name of `#voxel-spacing`.

use std::{fmt::Display, path::Path, str::FromStr};

use nalgebra::{vector, Vector3};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{line_ending, multispace0, space0, space1, u64 as parse_u64},
    combinator::{all_consuming, map},
    multi::many1,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::{Result, VolrayError};

/// Metadata of a raw volume file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawInfo {
    /// Voxel counts
    pub dims: Vector3<usize>,
    /// Physical size of one voxel
    pub voxel_spacing: Vector3<f32>,
}

enum Section {
    Dimensions(Vector3<usize>),
    VoxelSpacing(Vector3<f32>),
}

impl RawInfo {
    pub fn new(dims: Vector3<usize>, voxel_spacing: Vector3<f32>) -> Self {
        Self {
            dims,
            voxel_spacing,
        }
    }

    /// Read and parse an `.inf` file.
    pub fn from_file<P>(path: P) -> Result<RawInfo>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Write the sidecar in its textual form.
    pub fn write_file<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        std::fs::write(path, self.to_string())?;
        Ok(())
    }

    /// Number of samples described, `None` if it does not fit `usize`
    pub fn sample_count(&self) -> Option<usize> {
        self.dims
            .x
            .checked_mul(self.dims.y)?
            .checked_mul(self.dims.z)
    }
}

fn header_line<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(name), pair(space0, line_ending))
}

fn dims_triple(input: &str) -> IResult<&str, Vector3<usize>> {
    map(
        tuple((
            preceded(space0, parse_u64),
            preceded(space1, parse_u64),
            preceded(space1, parse_u64),
        )),
        |(x, y, z)| vector![x as usize, y as usize, z as usize],
    )(input)
}

fn float_triple(input: &str) -> IResult<&str, Vector3<f32>> {
    map(
        tuple((
            preceded(space0, float),
            preceded(space1, float),
            preceded(space1, float),
        )),
        |(x, y, z)| vector![x, y, z],
    )(input)
}

fn section(input: &str) -> IResult<&str, Section> {
    preceded(
        multispace0,
        alt((
            map(
                preceded(header_line("#dimensions"), dims_triple),
                Section::Dimensions,
            ),
            map(
                preceded(
                    alt((header_line("#voxel-spacing"), header_line("#aspect-ratio"))),
                    float_triple,
                ),
                Section::VoxelSpacing,
            ),
        )),
    )(input)
}

fn sections(input: &str) -> IResult<&str, Vec<Section>> {
    all_consuming(terminated(many1(section), multispace0))(input)
}

impl FromStr for RawInfo {
    type Err = VolrayError;

    fn from_str(s: &str) -> Result<Self> {
        let (_, parsed) = sections(s).map_err(|e| VolrayError::Parse(format!("{e}")))?;

        let mut dims = None;
        let mut voxel_spacing = None;
        for section in parsed {
            match section {
                Section::Dimensions(d) => dims = Some(d),
                Section::VoxelSpacing(v) => voxel_spacing = Some(v),
            }
        }

        let dims = dims.ok_or_else(|| VolrayError::Parse("missing #dimensions".into()))?;
        let voxel_spacing =
            voxel_spacing.ok_or_else(|| VolrayError::Parse("missing #voxel-spacing".into()))?;

        if dims.iter().any(|&d| d == 0) {
            return Err(VolrayError::InvalidData(format!(
                "Dimensions shouldn't contain any zeroes, got {dims:?}"
            )));
        }
        if voxel_spacing.iter().any(|&v| !(v > 0.0)) {
            return Err(VolrayError::InvalidData(format!(
                "Voxel spacing must be positive, got {voxel_spacing:?}"
            )));
        }

        let info = RawInfo {
            dims,
            voxel_spacing,
        };
        if info.sample_count().is_none() {
            return Err(VolrayError::InvalidData(format!(
                "Dimensions {dims:?} describe too many samples"
            )));
        }

        Ok(info)
    }
}

impl Display for RawInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "#dimensions")?;
        writeln!(f, "{} {} {}", self.dims.x, self.dims.y, self.dims.z)?;
        writeln!(f)?;
        writeln!(f, "#voxel-spacing")?;
        writeln!(
            f,
            "{} {} {}",
            self.voxel_spacing.x, self.voxel_spacing.y, self.voxel_spacing.z
        )
    }
}
