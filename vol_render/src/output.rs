use std::{error::Error, path::Path};

use image::{ImageBuffer, ImageFormat, Rgb, Rgba};
use volray::{render::Image, volumetric::Histogram};

/// Characters of the widest histogram bar
const BAR_WIDTH: usize = 50;

/// Save in the format named by the file extension.
///
/// PNG and BMP keep straight alpha over a transparent background,
/// JPEG has no alpha channel and is composited over black.
pub fn save_image(image: &Image, gamma: Option<f32>, path: &Path) -> Result<(), Box<dyn Error>> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| format!("Unknown image extension: {}", path.display()))?;

    let (width, height) = (image.width() as u32, image.height() as u32);

    match format {
        ImageFormat::Png | ImageFormat::Bmp => {
            let buffer = ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, image.to_rgba8(gamma))
                .ok_or("Image buffer does not match its resolution")?;
            buffer.save_with_format(path, format)?;
        }
        ImageFormat::Jpeg => {
            let buffer = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, image.to_rgb8(gamma))
                .ok_or("Image buffer does not match its resolution")?;
            buffer.save_with_format(path, format)?;
        }
        other => return Err(format!("Unsupported output format {other:?}").into()),
    }
    Ok(())
}

/// One line per non-empty bin: index, percentage of the tallest bin and a bar.
pub fn histogram_lines(histogram: &Histogram) -> Vec<String> {
    histogram
        .bins()
        .iter()
        .enumerate()
        .filter(|(_, percent)| **percent > 0.0)
        .map(|(bin, &percent)| {
            let bar_len = (percent / 100.0 * BAR_WIDTH as f32).ceil() as usize;
            format!("{bin:>3} {percent:>6.2}% {}", "#".repeat(bar_len))
        })
        .collect()
}
