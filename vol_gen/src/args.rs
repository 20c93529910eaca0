//! Argument parsing and validation
//! Uses library `clap`

use std::ffi::OsStr;

use clap::{Arg, Command, ValueHint};

// up to 32bit value
pub fn is_positive_number(num: &str) -> Result<(), String> {
    let n = num.parse::<u32>();
    match n {
        Ok(n) => {
            if n > 0 {
                Ok(())
            } else {
                Err("Number must be greater than 0".into())
            }
        }
        Err(_) => Err("Number required".into()),
    }
}

pub fn can_fit_u16(num: &str) -> Result<(), String> {
    let n = num.parse::<u16>();
    match n {
        Ok(_) => Ok(()),
        Err(_) => Err("Number does not fit in range <0;65535>".into()),
    }
}

pub fn is_float_number(num: &str) -> Result<(), String> {
    let n = num.parse::<f32>();
    match n {
        Ok(n) => {
            if n > 0.0 {
                Ok(())
            } else {
                Err("Number must be greater than 0.0".into())
            }
        }
        Err(_) => Err("Number required".into()),
    }
}

pub const GENERATOR_NAMES: &[&str] = &["shapes", "solid", "ball"];
const BIT_WIDTHS: &[&str] = &["8", "16"];

pub fn get_command<'a>() -> Command<'a> {
    Command::new("Vol-gen")
        .version("0.1.0")
        .about("Raw volume generator, writes samples and a .inf sidecar")
        .arg(
            Arg::new("dims")
                .help("Dimensions of volume")
                .long("dims")
                .short('d')
                .required(true)
                .number_of_values(3)
                .value_names(&["X", "Y", "Z"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("spacing")
                .help("Physical size of one voxel")
                .long("spacing")
                .short('s')
                .number_of_values(3)
                .value_names(&["X", "Y", "Z"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .default_values(&["1", "1", "1"])
                .validator(is_float_number),
        )
        .arg(
            Arg::new("bits")
                .help("Bits per sample")
                .long("bits")
                .short('b')
                .takes_value(true)
                .value_name("BITS")
                .default_value("8")
                .possible_values(BIT_WIDTHS),
        )
        .arg(
            Arg::new("generator")
                .help("Type of generator")
                .long("generator")
                .short('g')
                .required(true)
                .requires_ifs(&[("shapes", "n-of-shapes"), ("shapes", "object-size")])
                .takes_value(true)
                .value_name("NAME")
                .possible_values(GENERATOR_NAMES),
        )
        .arg(
            Arg::new("seed")
                .help("Seed for RNG, leave out for random seed")
                .long("seed")
                .value_name("SEED")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("sample")
                .help("Value of generated objects (peak value for ball)")
                .long("sample")
                .value_name("VALUE")
                .default_value("255")
                .validator(|s| is_positive_number(s).and(can_fit_u16(s))),
        )
        .arg(
            Arg::new("object-size")
                .help("Size of individual generated objects")
                .long("object-size")
                .value_name("SIDE")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("n-of-shapes")
                .help("Number of shapes generated in volume")
                .long("n-of-shapes")
                .value_name("N")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("output-file")
                .help("File name to output")
                .long("output-file")
                .short('o')
                .value_name("FILE")
                .allow_invalid_utf8(true)
                .value_hint(ValueHint::FilePath)
                .default_value_os(OsStr::new("a.raw")),
        )
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn validators() {
        assert!(is_positive_number("3").is_ok());
        assert!(is_positive_number("0").is_err());
        assert!(is_positive_number("-3").is_err());
        assert!(can_fit_u16("65535").is_ok());
        assert!(can_fit_u16("65536").is_err());
        assert!(is_float_number("0.5").is_ok());
        assert!(is_float_number("0").is_err());
    }

    #[test]
    fn command_is_well_formed() {
        get_command().debug_assert();
    }

    #[test]
    fn shapes_requires_size() {
        let res = get_command().try_get_matches_from(["vol_gen", "--dims=8,8,8", "-g", "shapes"]);

        assert!(res.is_err());
    }
}
