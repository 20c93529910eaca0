//! Argument parsing and validation
//! Uses library `clap`

use std::ffi::OsStr;

use clap::{Arg, Command, ValueHint};

pub fn is_positive_number(num: &str) -> Result<(), String> {
    match num.parse::<u32>() {
        Ok(n) if n > 0 => Ok(()),
        Ok(_) => Err("Number must be greater than 0".into()),
        Err(_) => Err("Number required".into()),
    }
}

pub fn is_number(num: &str) -> Result<(), String> {
    num.parse::<u32>()
        .map(|_| ())
        .map_err(|_| "Non-negative number required".into())
}

pub fn is_non_negative_float(num: &str) -> Result<(), String> {
    match num.parse::<f32>() {
        Ok(n) if n >= 0.0 && n.is_finite() => Ok(()),
        Ok(_) => Err("Number must be finite and at least 0.0".into()),
        Err(_) => Err("Number required".into()),
    }
}

pub fn is_positive_float(num: &str) -> Result<(), String> {
    match num.parse::<f32>() {
        Ok(n) if n > 0.0 && n.is_finite() => Ok(()),
        Ok(_) => Err("Number must be greater than 0.0".into()),
        Err(_) => Err("Number required".into()),
    }
}

pub fn is_float(num: &str) -> Result<(), String> {
    match num.parse::<f32>() {
        Ok(n) if n.is_finite() => Ok(()),
        _ => Err("Number required".into()),
    }
}

pub fn is_integer(num: &str) -> Result<(), String> {
    num.parse::<i32>()
        .map(|_| ())
        .map_err(|_| "Integer required".into())
}

const BIT_WIDTHS: &[&str] = &["8", "16"];
const VIEW_NAMES: &[&str] = &["default", "top", "bottom"];
const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

pub fn get_command<'a>() -> Command<'a> {
    Command::new("Vol-render")
        .version("0.1.0")
        .about("Renders a raw or PVM volume to an image")
        .arg(
            Arg::new("input")
                .help("Raw volume file described by a FILE.inf sidecar, or a .pvm file")
                .required(true)
                .value_name("FILE")
                .allow_invalid_utf8(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("bits")
                .help("Bits per sample")
                .long("bits")
                .short('b')
                .value_name("BITS")
                .default_value("8")
                .possible_values(BIT_WIDTHS),
        )
        .arg(
            Arg::new("dims")
                .help("Volume dimensions, used to write FILE.inf when it is missing")
                .long("dims")
                .number_of_values(3)
                .value_names(&["X", "Y", "Z"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("spacing")
                .help("Physical size of one voxel, written to FILE.inf together with --dims")
                .long("spacing")
                .number_of_values(3)
                .value_names(&["X", "Y", "Z"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .default_values(&["1", "1", "1"])
                .validator(is_positive_float),
        )
        .arg(
            Arg::new("width")
                .help("Image width")
                .long("width")
                .value_name("PIXELS")
                .default_value("512")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("height")
                .help("Image height")
                .long("height")
                .value_name("PIXELS")
                .default_value("512")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("alpha")
                .help("Opacity multiplier of every sample")
                .long("alpha")
                .short('a')
                .value_name("SCALE")
                .default_value("1.0")
                .validator(is_non_negative_float),
        )
        .arg(
            Arg::new("min")
                .help("Lower end of the density window, dataset default when left out")
                .long("min")
                .value_name("VALUE")
                .validator(is_number),
        )
        .arg(
            Arg::new("max")
                .help("Upper end of the density window, dataset default when left out")
                .long("max")
                .value_name("VALUE")
                .validator(is_number),
        )
        .arg(
            Arg::new("mip")
                .help("Maximum intensity projection instead of compositing")
                .long("mip"),
        )
        .arg(
            Arg::new("view")
                .help("Orientation of the volume")
                .long("view")
                .value_name("VIEW")
                .default_value("default")
                .possible_values(VIEW_NAMES),
        )
        .arg(
            Arg::new("zenith")
                .help("Orbit step along the zenith angle")
                .long("zenith")
                .value_name("STEP")
                .default_value("0")
                .allow_hyphen_values(true)
                .validator(is_float),
        )
        .arg(
            Arg::new("azimuth")
                .help("Orbit step along the azimuth angle")
                .long("azimuth")
                .value_name("STEP")
                .default_value("0")
                .allow_hyphen_values(true)
                .validator(is_float),
        )
        .arg(
            Arg::new("zoom")
                .help("Dolly steps towards the volume, negative moves away")
                .long("zoom")
                .value_name("STEPS")
                .default_value("0")
                .allow_hyphen_values(true)
                .validator(is_integer),
        )
        .arg(
            Arg::new("fixed-origin")
                .help("Shoot rays from the origin and push the volume OFFSET away, ignores the camera")
                .long("fixed-origin")
                .value_name("OFFSET")
                .takes_value(true)
                .min_values(0)
                .require_equals(true)
                .validator(is_positive_float),
        )
        .arg(
            Arg::new("threads")
                .help("Render threads, all cores when left out")
                .long("threads")
                .short('t')
                .value_name("N")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("gamma")
                .help("Gamma encode the output, 2.2 when no value is given")
                .long("gamma")
                .value_name("GAMMA")
                .takes_value(true)
                .min_values(0)
                .require_equals(true)
                .validator(is_positive_float),
        )
        .arg(
            Arg::new("histogram")
                .help("Print the density histogram")
                .long("histogram"),
        )
        .arg(
            Arg::new("log-level")
                .help("Logging verbosity")
                .long("log-level")
                .value_name("LEVEL")
                .default_value("info")
                .possible_values(LOG_LEVELS),
        )
        .arg(
            Arg::new("output-file")
                .help("Image to write")
                .long("output-file")
                .short('o')
                .value_name("FILE")
                .allow_invalid_utf8(true)
                .value_hint(ValueHint::FilePath)
                .default_value_os(OsStr::new("out.png")),
        )
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn validators() {
        assert!(is_number("0").is_ok());
        assert!(is_number("-1").is_err());
        assert!(is_non_negative_float("0").is_ok());
        assert!(is_positive_float("0").is_err());
        assert!(is_float("-1.5").is_ok());
        assert!(is_float("inf").is_err());
        assert!(is_integer("-3").is_ok());
    }

    #[test]
    fn command_is_well_formed() {
        get_command().debug_assert();
    }
}
