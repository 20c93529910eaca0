use std::{ffi::OsString, str::FromStr};

use clap::ArgMatches;
use nalgebra::{vector, Vector3};
use volray::volumetric::SampleFormat;

/// Transform `Values` into `Vector`
fn values_to_vector3<T>(args: &ArgMatches, key: &str) -> Result<Vector3<T>, String>
where
    T: FromStr + Copy,
{
    let vals: Vec<T> = args
        .values_of(key)
        .ok_or_else(|| format!("Missing argument '{key}'"))?
        .map(|v| v.parse::<T>().map_err(|_| format!("Bad value '{v}' of '{key}'")))
        .collect::<Result<_, _>>()?;
    match vals[..] {
        [x, y, z] => Ok(vector![x, y, z]),
        _ => Err(format!("Argument '{key}' needs 3 values")),
    }
}

fn parse_value<T>(args: &ArgMatches, key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
{
    args.value_of(key)
        .map(|v| v.parse::<T>().map_err(|_| format!("Bad value '{v}' of '{key}'")))
        .transpose()
}

fn required_value<T>(args: &ArgMatches, key: &str) -> Result<T, String>
where
    T: FromStr,
{
    parse_value(args, key)?.ok_or_else(|| format!("Missing argument '{key}'"))
}

/// App configuration
/// Config is built from args parsed by `clap`
#[derive(Debug)]
pub struct Config {
    /// Dimensions of volume
    pub dims: Vector3<u32>,
    /// Physical size of one voxel
    pub spacing: Vector3<f32>,
    /// Width of stored samples
    pub format: SampleFormat,
    /// Type of generator to be used
    pub generator: GeneratorConfig,
    // Output file name
    pub file_name: OsString,
    /// Optional seed for RNG, to replicate results
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_args(args: &ArgMatches) -> Result<Config, String> {
        let dims = values_to_vector3(args, "dims")?;
        let spacing = values_to_vector3(args, "spacing")?;
        let format: SampleFormat = required_value(args, "bits")?;
        let generator = GeneratorConfig::from_args(args)?;

        // 16 bit samples always fit, validated by parser
        let sample = generator.sample();
        if format == SampleFormat::U8 && sample > u8::MAX as u16 {
            return Err(format!("Sample {sample} does not fit in 8 bits"));
        }

        let file_name = args
            .value_of_os("output-file")
            .ok_or("Missing output file")?
            .into();

        let seed = parse_value(args, "seed")?;

        Ok(Config {
            dims,
            spacing,
            format,
            generator,
            file_name,
            seed,
        })
    }
}

/// Settings specific to generator variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeneratorConfig {
    /// Randomly placed cuboids and spheres
    Shapes {
        n_of_shapes: usize,
        sample: u16,
        obj_size: u32,
    },
    /// Constant block with an empty border
    Solid { sample: u16 },
    /// Density falling off from the centre
    Ball { sample: u16 },
}

impl GeneratorConfig {
    pub fn from_args(args: &ArgMatches) -> Result<GeneratorConfig, String> {
        let name: String = required_value(args, "generator")?;
        let sample = required_value(args, "sample")?;

        match name.as_str() {
            "shapes" => Ok(GeneratorConfig::Shapes {
                n_of_shapes: required_value(args, "n-of-shapes")?,
                sample,
                obj_size: required_value(args, "object-size")?,
            }),
            "solid" => Ok(GeneratorConfig::Solid { sample }),
            "ball" => Ok(GeneratorConfig::Ball { sample }),
            _ => Err(format!("Unknown generator '{name}'")),
        }
    }

    pub fn sample(&self) -> u16 {
        match *self {
            GeneratorConfig::Shapes { sample, .. }
            | GeneratorConfig::Solid { sample }
            | GeneratorConfig::Ball { sample } => sample,
        }
    }
}
