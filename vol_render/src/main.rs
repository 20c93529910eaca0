use std::{error::Error, path::Path, time::Instant};

use log::info;
use volray::{
    render::ParallelRenderer,
    volumetric::{
        default_window, from_pvm_file, from_raw_file_or, Histogram, LinearVolume, SampleFormat,
    },
};

mod args;
mod config;
mod output;

use crate::{
    args::get_command,
    config::Config,
    output::{histogram_lines, save_image},
};

fn is_pvm(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("pvm"))
}

/// PVM files carry their own sample format, raw files use the configured one.
fn load_volume(cfg: &Config) -> Result<(LinearVolume, SampleFormat), Box<dyn Error>> {
    if is_pvm(&cfg.input) {
        Ok(from_pvm_file(&cfg.input)?)
    } else {
        let volume = from_raw_file_or(&cfg.input, cfg.format, cfg.fallback_info)?;
        Ok((volume, cfg.format))
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = get_command().get_matches();
    let cfg = Config::from_args(&args)?;

    env_logger::Builder::new()
        .filter_level(cfg.log_level)
        .init();

    let (volume, format) = load_volume(&cfg)?;

    if cfg.histogram {
        for line in histogram_lines(&Histogram::from_volume(&volume, format)) {
            println!("{line}");
        }
    }

    let window = cfg.window(default_window(&volume, format));
    info!("Density window [{}, {}]", window.min_val, window.max_val);

    let render_options = cfg.render_options(window)?;
    let renderer = match cfg.threads {
        Some(workers) => ParallelRenderer::with_workers(volume, render_options, workers),
        None => ParallelRenderer::new(volume, render_options),
    };

    let start = Instant::now();
    let image = renderer.render_image(&cfg.camera())?;
    info!("Frame rendered in {} ms", start.elapsed().as_millis());

    save_image(&image, cfg.gamma, &cfg.output)?;

    info!("Image saved: {}", cfg.output.display());
    Ok(())
}

pub fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
