use std::{path::PathBuf, str::FromStr};

use clap::ArgMatches;
use log::LevelFilter;
use nalgebra::{vector, Vector2, Vector3};
use volray::{
    camera::{Camera, CameraFrame, OrbitCamera},
    common::ViewMode,
    render::{DensityWindow, RenderOptions, DEFAULT_DEPTH_OFFSET, GAMMA},
    volumetric::{RawInfo, SampleFormat},
    Result as VolrayResult,
};

/// Vertical field of view of the orbit camera, in degrees
const FOV_Y: f32 = 30.0;

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

fn values_to_vector3<T>(args: &ArgMatches, key: &str) -> Result<Option<Vector3<T>>, String>
where
    T: FromStr + Copy,
{
    let values = match args.values_of(key) {
        Some(values) => values,
        None => return Ok(None),
    };
    let vals: Vec<T> = values
        .map(|v| v.parse::<T>().map_err(|_| format!("Bad value '{v}' of '{key}'")))
        .collect::<Result<_, _>>()?;
    match vals[..] {
        [x, y, z] => Ok(Some(vector![x, y, z])),
        _ => Err(format!("Argument '{key}' needs 3 values")),
    }
}

/// Value of a flag with an optional value, `default` when given bare
fn optional_flag_value(args: &ArgMatches, key: &str, default: f32) -> Result<Option<f32>, String> {
    if !args.is_present(key) {
        return Ok(None);
    }
    Ok(Some(parse_value(args, key)?.unwrap_or(default)))
}

/// App configuration
/// Config is built from args parsed by `clap`
#[derive(Debug)]
pub struct Config {
    pub input: PathBuf,
    /// Written as the `.inf` sidecar when the raw file has none
    pub fallback_info: Option<RawInfo>,
    pub format: SampleFormat,
    pub resolution: Vector2<usize>,
    pub alpha_scale: f32,
    /// Density window ends, dataset defaults fill the missing ones
    pub window_min: Option<u32>,
    pub window_max: Option<u32>,
    pub mip: bool,
    pub view_mode: ViewMode,
    pub zenith: f32,
    pub azimuth: f32,
    pub zoom: i32,
    /// Volume offset when shooting from the origin
    pub fixed_origin: Option<f32>,
    pub threads: Option<usize>,
    pub gamma: Option<f32>,
    pub histogram: bool,
    pub log_level: LevelFilter,
    pub output: PathBuf,
}

impl Config {
    pub fn from_args(args: &ArgMatches) -> Result<Config, String> {
        let input = args.value_of_os("input").ok_or("Missing input file")?.into();
        let output = args
            .value_of_os("output-file")
            .ok_or("Missing output file")?
            .into();

        let fallback_info = match values_to_vector3::<usize>(args, "dims")? {
            Some(dims) => {
                let spacing = values_to_vector3(args, "spacing")?
                    .unwrap_or_else(|| vector![1.0, 1.0, 1.0]);
                Some(RawInfo::new(dims, spacing))
            }
            None => None,
        };

        let format = required_value(args, "bits")?;
        let resolution = vector![
            required_value(args, "width")?,
            required_value(args, "height")?
        ];

        Ok(Config {
            input,
            fallback_info,
            format,
            resolution,
            alpha_scale: required_value(args, "alpha")?,
            window_min: parse_value(args, "min")?,
            window_max: parse_value(args, "max")?,
            mip: args.is_present("mip"),
            view_mode: required_value(args, "view")?,
            zenith: required_value(args, "zenith")?,
            azimuth: required_value(args, "azimuth")?,
            zoom: required_value(args, "zoom")?,
            fixed_origin: optional_flag_value(args, "fixed-origin", DEFAULT_DEPTH_OFFSET)?,
            threads: parse_value(args, "threads")?,
            gamma: optional_flag_value(args, "gamma", GAMMA)?,
            histogram: args.is_present("histogram"),
            log_level: required_value(args, "log-level")?,
            output,
        })
    }

    /// Fill missing window ends from `dataset_default`.
    pub fn window(&self, dataset_default: DensityWindow) -> DensityWindow {
        DensityWindow::new(
            self.window_min.unwrap_or(dataset_default.min_val),
            self.window_max.unwrap_or(dataset_default.max_val),
        )
    }

    pub fn render_options(&self, window: DensityWindow) -> VolrayResult<RenderOptions> {
        let builder = RenderOptions::builder()
            .resolution(self.resolution)
            .alpha_scale(self.alpha_scale)
            .window(window)
            .mip(self.mip)
            .view_mode(self.view_mode);

        match self.fixed_origin {
            Some(offset) => builder.fixed_origin(offset),
            None => builder,
        }
        .build()
    }

    /// Orbit camera after the configured rotation and dolly steps.
    pub fn camera(&self) -> CameraFrame {
        let mut camera = OrbitCamera::new(FOV_Y);
        camera.set_orientation(0.0, self.zenith, self.azimuth);

        let step = self.zoom.signum() as f32;
        for _ in 0..self.zoom.unsigned_abs() {
            camera.set_orientation(step, 0.0, 0.0);
        }
        camera.frame()
    }
}
