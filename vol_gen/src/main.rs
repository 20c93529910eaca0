use std::error::Error;

use config::Config;

mod args;
mod config;
mod file;
mod generators;

use crate::{
    args::get_command,
    file::write_volume,
    generators::{generate_samples, get_sample_generator, slice_progress_bar},
};

fn run() -> Result<(), Box<dyn Error>> {
    let args = get_command().get_matches();
    let cfg = Config::from_args(&args)?;

    println!("Generating volume...");
    println!("{:?}", cfg);

    let gen = get_sample_generator(&cfg);
    let progress = slice_progress_bar(cfg.dims);
    let samples = generate_samples(gen.as_ref(), cfg.dims, &progress);
    progress.finish();

    write_volume(&cfg, &samples)?;

    println!("Generating finished, result in {:?}", cfg.file_name);
    Ok(())
}

pub fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
