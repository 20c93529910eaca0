/// Range of raw samples mapped onto opacity `[0, 1]`.
///
/// Samples are clamped into the window and rescaled linearly, both ends inclusive:
/// `min_val` maps to 0 and `max_val` to 1. Samples outside are not culled, they take the edge value.
/// A zero-width window is a step at `max_val`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityWindow {
    pub min_val: u32,
    pub max_val: u32,
}

impl DensityWindow {
    pub fn new(min_val: u32, max_val: u32) -> Self {
        Self { min_val, max_val }
    }

    pub fn is_valid(&self) -> bool {
        self.min_val <= self.max_val
    }

    /// Normalized opacity of a raw sample, always in `[0, 1]`.
    pub fn opacity(&self, sample: f32) -> f32 {
        if sample.is_nan() {
            return 0.0;
        }

        let min = self.min_val as f32;
        let max = self.max_val as f32;

        if max <= min {
            return if sample >= max { 1.0 } else { 0.0 };
        }

        (sample.clamp(min, max) - min) / (max - min)
    }
}

impl Default for DensityWindow {
    fn default() -> Self {
        DensityWindow::new(0, 255)
    }
}

#[cfg(test)]
mod test {

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn full_8_bit_window() {
        let window = DensityWindow::new(0, 255);

        assert_relative_eq!(window.opacity(128.0), 128.0 / 255.0, epsilon = 1e-6);
        assert_eq!(window.opacity(0.0), 0.0);
        assert_eq!(window.opacity(255.0), 1.0);
    }

    #[test]
    fn boundaries_inclusive() {
        let window = DensityWindow::new(50, 150);

        assert_eq!(window.opacity(50.0), 0.0);
        assert_eq!(window.opacity(150.0), 1.0);
        assert_relative_eq!(window.opacity(100.0), 0.5);
    }

    #[test]
    fn outside_clamped_not_culled() {
        let window = DensityWindow::new(50, 150);

        assert_eq!(window.opacity(10.0), 0.0);
        assert_eq!(window.opacity(1000.0), 1.0);
        assert_eq!(window.opacity(-3.0), 0.0);
    }

    #[test]
    fn zero_width_is_step() {
        let window = DensityWindow::new(100, 100);

        assert_eq!(window.opacity(99.9), 0.0);
        assert_eq!(window.opacity(100.0), 1.0);
        assert_eq!(window.opacity(180.0), 1.0);
    }

    #[test]
    fn always_unit_range() {
        let windows = [
            DensityWindow::new(0, 255),
            DensityWindow::new(30, 31),
            DensityWindow::new(7, 7),
            DensityWindow::new(0, 65535),
        ];
        for window in windows {
            for s in [-1e6, -1.0, 0.0, 6.5, 30.5, 254.9, 4096.0, 1e9, f32::NAN] {
                let o = window.opacity(s);
                assert!((0.0..=1.0).contains(&o), "{window:?} {s} -> {o}");
            }
        }
    }
}
