use nalgebra::Vector2;

use crate::{
    color::{self, RGBA},
    common::PixelBox,
};

/// Display gamma for [`Image::to_rgba8`] and [`Image::to_rgb8`]
pub const GAMMA: f32 = 2.2;

/// Output surface: premultiplied, linear RGBA per pixel, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    resolution: Vector2<usize>,
    pixels: Vec<RGBA>,
}

impl Image {
    /// Fully transparent image
    pub fn new(resolution: Vector2<usize>) -> Image {
        Image {
            resolution,
            pixels: vec![color::zero(); resolution.x * resolution.y],
        }
    }

    pub fn resolution(&self) -> Vector2<usize> {
        self.resolution
    }

    pub fn width(&self) -> usize {
        self.resolution.x
    }

    pub fn height(&self) -> usize {
        self.resolution.y
    }

    pub fn pixels(&self) -> &[RGBA] {
        &self.pixels
    }

    pub fn clear(&mut self) {
        self.pixels.fill(color::zero());
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.resolution.x && y < self.resolution.y {
            Some(x + y * self.resolution.x)
        } else {
            None
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<RGBA> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel. Coordinates outside the image are ignored, returns whether it was written.
    pub fn set(&mut self, x: usize, y: usize, color: RGBA) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Copy a rendered tile, `colors` row by row.
    /// Parts of the tile outside the image are skipped.
    pub fn copy_tile(&mut self, tile: &PixelBox, colors: &[RGBA]) {
        let mut colors = colors.iter();
        for y in tile.y.clone() {
            for x in tile.x.clone() {
                match colors.next() {
                    Some(&c) => {
                        self.set(x, y, c);
                    }
                    None => return,
                }
            }
        }
    }

    /// Straight-alpha RGBA bytes, colors gamma encoded when `gamma` is given.
    pub fn to_rgba8(&self, gamma: Option<f32>) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            let alpha = px.w.clamp(0.0, 1.0);
            let straight = if px.w > 0.0 { px.xyz() / px.w } else { px.xyz() };
            bytes.extend(straight.iter().map(|&c| encode(c, gamma)));
            bytes.push(to_byte(alpha));
        }
        bytes
    }

    /// RGB bytes over a black background, gamma encoded when `gamma` is given.
    pub fn to_rgb8(&self, gamma: Option<f32>) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for px in &self.pixels {
            // Premultiplied color over black is the color itself
            bytes.extend(px.xyz().iter().map(|&c| encode(c, gamma)));
        }
        bytes
    }
}

fn encode(c: f32, gamma: Option<f32>) -> u8 {
    let c = c.clamp(0.0, 1.0);
    match gamma {
        Some(g) => to_byte(c.powf(1.0 / g)),
        None => to_byte(c),
    }
}

fn to_byte(c: f32) -> u8 {
    (c * 255.0).round() as u8
}
