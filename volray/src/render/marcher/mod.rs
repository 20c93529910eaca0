//! Sampling along a ray and reducing the samples into a color.

mod accumulate;

pub use accumulate::{Accumulator, Compositing, MaximumIntensity, Sample};

use nalgebra::{Point3, Vector3};

use crate::{color::RGBA, common::Ray, volumetric::Volume};

use super::{DensityWindow, ProjectionMode, RenderOptions, VolumePlacement};

/// Why marching stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Sample point left the volume
    ExitedVolume,
    /// Accumulated opacity reached the termination threshold
    Saturated,
    /// Iteration cap reached first
    IterationCap,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchOutcome {
    /// Premultiplied color
    pub color: RGBA,
    /// Samples taken
    pub steps: usize,
    pub termination: Termination,
}

/// Marching parameters, constant for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchSettings {
    pub window: DensityWindow,
    pub alpha_scale: f32,
    /// World-space distance between samples
    pub step_length: f32,
    /// `step_length` relative to the reference step
    pub step_ratio: f32,
    pub entry_epsilon: f32,
    pub max_iterations: usize,
    pub ert_threshold: Option<f32>,
    pub projection: ProjectionMode,
}

impl MarchSettings {
    pub fn new(options: &RenderOptions, placement: &VolumePlacement) -> MarchSettings {
        MarchSettings {
            window: options.window,
            alpha_scale: options.alpha_scale,
            step_length: placement.reference_step() * options.step_scale,
            step_ratio: options.step_scale,
            entry_epsilon: options.entry_epsilon,
            max_iterations: options.max_iterations,
            ert_threshold: options.ert_threshold,
            projection: options.projection,
        }
    }
}

/// Walks a ray through the volume in fixed steps, yielding windowed samples.
///
/// Stops when the sample point leaves `[0, 1]^3` in sampling space or after
/// `max_iterations` samples, see [`SampleMarcher::termination`].
pub struct SampleMarcher<'a, V>
where
    V: Volume + ?Sized,
{
    volume: &'a V,
    placement: &'a VolumePlacement,
    window: DensityWindow,
    alpha_scale: f32,
    pos: Point3<f32>,
    step: Vector3<f32>,
    taken: usize,
    max_iterations: usize,
    stopped: Option<Termination>,
}

impl<'a, V> SampleMarcher<'a, V>
where
    V: Volume + ?Sized,
{
    /// Marching starts just past `max(t_min, 0)`, never behind the ray origin.
    pub fn new(
        volume: &'a V,
        placement: &'a VolumePlacement,
        ray: &Ray,
        t_min: f32,
        settings: &MarchSettings,
    ) -> Self {
        let t_start = t_min.max(0.0) + settings.entry_epsilon;

        Self {
            volume,
            placement,
            window: settings.window,
            alpha_scale: settings.alpha_scale,
            pos: ray.point_from_t(t_start),
            step: ray.direction * settings.step_length,
            taken: 0,
            max_iterations: settings.max_iterations,
            stopped: None,
        }
    }

    /// Samples yielded so far
    pub fn steps(&self) -> usize {
        self.taken
    }

    /// Reason the marcher stopped, `None` while it still yields samples.
    pub fn termination(&self) -> Option<Termination> {
        self.stopped
    }
}

impl<'a, V> Iterator for SampleMarcher<'a, V>
where
    V: Volume + ?Sized,
{
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.stopped.is_some() {
            return None;
        }

        if self.taken >= self.max_iterations {
            self.stopped = Some(Termination::IterationCap);
            return None;
        }

        let coord = self.placement.to_sampling_space(self.pos);
        // NaN coordinates count as outside
        if coord.iter().any(|c| !(0.0..=1.0).contains(c)) {
            self.stopped = Some(Termination::ExitedVolume);
            return None;
        }

        let raw = self.volume.sample_normalized(coord);
        let value = self.window.opacity(raw);

        self.pos += self.step;
        self.taken += 1;

        Some(Sample::new(value, value * self.alpha_scale))
    }
}

/// Feed samples to `accumulator` until the marcher stops or the accumulator saturates.
pub fn accumulate<V, A>(marcher: &mut SampleMarcher<'_, V>, mut accumulator: A) -> MarchOutcome
where
    V: Volume + ?Sized,
    A: Accumulator,
{
    let termination = loop {
        if accumulator.is_saturated() {
            break Termination::Saturated;
        }
        match marcher.next() {
            Some(sample) => accumulator.add(sample),
            None => break marcher.termination().unwrap_or(Termination::ExitedVolume),
        }
    };

    MarchOutcome {
        color: accumulator.color(),
        steps: marcher.steps(),
        termination,
    }
}

/// March one ray that entered the box at `t_min`, using the configured projection.
pub fn march<V>(
    volume: &V,
    placement: &VolumePlacement,
    ray: &Ray,
    t_min: f32,
    settings: &MarchSettings,
) -> MarchOutcome
where
    V: Volume + ?Sized,
{
    let mut marcher = SampleMarcher::new(volume, placement, ray, t_min, settings);

    match settings.projection {
        ProjectionMode::Composite => accumulate(
            &mut marcher,
            Compositing::new(settings.ert_threshold, settings.step_ratio),
        ),
        ProjectionMode::MaximumIntensity => accumulate(&mut marcher, MaximumIntensity::new()),
    }
}
