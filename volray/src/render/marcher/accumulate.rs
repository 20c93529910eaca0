use crate::color::{self, RGBA};

/// One sample along a ray, after windowing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Windowed density in `[0, 1]`, used as the gray level
    pub value: f32,
    /// Opacity, `value` times the alpha scale
    pub opacity: f32,
}

impl Sample {
    pub fn new(value: f32, opacity: f32) -> Self {
        Self { value, opacity }
    }

    /// Gray color premultiplied by opacity.
    pub fn premultiplied(&self) -> RGBA {
        color::mono(self.value * self.opacity, self.opacity)
    }
}

/// Reduces the samples of one ray into a color.
pub trait Accumulator {
    fn add(&mut self, sample: Sample);

    /// No further sample can change the result noticeably
    fn is_saturated(&self) -> bool {
        false
    }

    /// Accumulated color, premultiplied alpha
    fn color(&self) -> RGBA;
}

/// Front-to-back alpha compositing: `dest += src * (1 - dest.a)`.
#[derive(Debug, Clone)]
pub struct Compositing {
    accum: RGBA,
    threshold: Option<f32>,
    opacity_exponent: f32,
}

impl Compositing {
    /// `threshold` is the early termination opacity.
    /// `step_ratio` is the step length relative to the one opacities are specified for.
    pub fn new(threshold: Option<f32>, step_ratio: f32) -> Self {
        Self {
            accum: color::zero(),
            threshold,
            opacity_exponent: step_ratio,
        }
    }
}

impl Accumulator for Compositing {
    fn add(&mut self, sample: Sample) {
        // Opacity correction for a different step length:
        // https://developer.nvidia.com/gpugems/gpugems/part-vi-beyond-triangles/chapter-39-volume-rendering-techniques
        let opacity = if self.opacity_exponent == 1.0 {
            sample.opacity
        } else {
            1.0 - (1.0 - sample.opacity.min(1.0)).powf(self.opacity_exponent)
        };

        let src = Sample::new(sample.value, opacity).premultiplied();
        self.accum += src * (1.0 - self.accum.w);
    }

    fn is_saturated(&self) -> bool {
        match self.threshold {
            Some(t) => self.accum.w >= t,
            None => false,
        }
    }

    fn color(&self) -> RGBA {
        self.accum
    }
}

/// Maximum intensity projection: keeps the most opaque sample.
#[derive(Debug, Clone)]
pub struct MaximumIntensity {
    max: RGBA,
}

impl MaximumIntensity {
    pub fn new() -> Self {
        Self { max: color::zero() }
    }
}

impl Default for MaximumIntensity {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator for MaximumIntensity {
    fn add(&mut self, sample: Sample) {
        if sample.opacity > self.max.w {
            self.max = sample.premultiplied();
        }
    }

    fn color(&self) -> RGBA {
        self.max
    }
}
