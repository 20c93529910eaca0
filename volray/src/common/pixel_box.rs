use std::{cmp::min, ops::Range};

use nalgebra::{point, Point2, Vector2};

/// Rectangle of pixels, half-open on both axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBox {
    pub x: Range<usize>,
    pub y: Range<usize>,
}

impl PixelBox {
    pub fn new(x: Range<usize>, y: Range<usize>) -> Self {
        Self { x, y }
    }

    /// Whole image
    pub fn full(resolution: Vector2<usize>) -> Self {
        Self {
            x: 0..resolution.x,
            y: 0..resolution.y,
        }
    }

    pub fn width(&self) -> usize {
        self.x.len()
    }

    pub fn height(&self) -> usize {
        self.y.len()
    }

    pub fn items(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.x.contains(&x) && self.y.contains(&y)
    }

    /// Split into square tiles of `side` pixels, row by row.
    /// Tiles on the right and bottom edge are clipped.
    pub fn tiles(&self, side: usize) -> impl Iterator<Item = PixelBox> + '_ {
        let side = side.max(1);
        self.y.clone().step_by(side).flat_map(move |y0| {
            let y1 = min(y0 + side, self.y.end);
            self.x.clone().step_by(side).map(move |x0| {
                let x1 = min(x0 + side, self.x.end);
                PixelBox::new(x0..x1, y0..y1)
            })
        })
    }
}

/// 2D range in normalized image coordinates (`[0, 1]` on both axes).
/// Grows by adding points, then converts to a [`PixelBox`].
#[derive(Debug, Clone)]
pub struct ViewportBox {
    pub lower: Point2<f32>,
    pub upper: Point2<f32>,
}

impl ViewportBox {
    // Maximum viewport, flipped
    pub fn new() -> Self {
        Self {
            lower: point![f32::INFINITY, f32::INFINITY],
            upper: point![f32::NEG_INFINITY, f32::NEG_INFINITY],
        }
    }

    pub fn add_point(&mut self, x: f32, y: f32) {
        self.upper.x = f32::max(self.upper.x, x);
        self.upper.y = f32::max(self.upper.y, y);
        self.lower.x = f32::min(self.lower.x, x);
        self.lower.y = f32::min(self.lower.y, y);
    }

    /// Pixels covered by the box, rounded outwards and clipped to the image.
    pub fn get_pixel_range(&self, resolution: Vector2<usize>) -> PixelBox {
        let res_f = resolution.map(|v| v as f32);

        let lower = self.lower.coords.component_mul(&res_f).map(f32::floor);
        let upper = self.upper.coords.component_mul(&res_f).map(f32::ceil);

        // Negative floats saturate to zero in the cast
        let start_x = min(lower.x.max(0.0) as usize, resolution.x);
        let start_y = min(lower.y.max(0.0) as usize, resolution.y);
        let end_x = min(upper.x.max(0.0) as usize, resolution.x);
        let end_y = min(upper.y.max(0.0) as usize, resolution.y);

        PixelBox::new(start_x..end_x.max(start_x), start_y..end_y.max(start_y))
    }
}

impl Default for ViewportBox {
    fn default() -> Self {
        Self::new()
    }
}
