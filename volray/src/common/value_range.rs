use std::ops::{Deref, RangeInclusive};

/// Range of sample values, typically the minimum and maximum of a dataset.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ValueRange {
    /// Lower bound
    pub low: f32,
    /// Upper bound
    pub high: f32,
}

impl ValueRange {
    /// Constructs new, empty range.
    pub fn empty() -> ValueRange {
        ValueRange {
            low: f32::NAN,
            high: f32::NAN,
        }
    }

    /// Constructs new range with one element, `val`.
    pub fn seed(val: f32) -> ValueRange {
        ValueRange {
            low: val,
            high: val,
        }
    }

    /// Constructs minimal range, where all samples from an iterator
    /// are inside the range.
    pub fn from_samples<T, I>(iter: impl IntoIterator<Item = T>) -> ValueRange
    where
        T: Deref<Target = I>,
        I: Into<f32> + Copy,
    {
        let mut range = ValueRange::empty();
        for val in iter {
            range.extend((*val).into());
        }
        range
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_nan() || self.high.is_nan()
    }

    /// Extend the range with new value.
    pub fn extend(&mut self, val: f32) {
        if self.is_empty() {
            self.low = val;
            self.high = val;
        }

        if val > self.high {
            self.high = val;
        }

        if val < self.low {
            self.low = val;
        }
    }

    /// Check if value is inside the range, bounds included.
    pub fn contains(&self, val: f32) -> bool {
        self.low <= val && val <= self.high
    }

    /// Distance between bounds, zero for empty range.
    pub fn width(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.high - self.low
        }
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::empty()
    }
}

/// Conversion from standard library type.
/// Unlocks simple syntax:
/// ```
/// # use volray::common::ValueRange;
/// let range: ValueRange = (0.0..=255.0).into();
/// assert!(range.contains(255.0));
/// ```
impl From<RangeInclusive<f32>> for ValueRange {
    fn from(range: RangeInclusive<f32>) -> Self {
        ValueRange {
            low: *range.start(),
            high: *range.end(),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn value_range() {
        let values = [0.0, 5.0, 3.0, -2.5];

        let mut range = ValueRange::seed(1.0);

        assert!(range.contains(1.0));
        assert!(!range.contains(1.2));
        assert!(!range.contains(0.9));

        for val in values {
            range.extend(val);
        }

        assert_eq!(range.low, -2.5);
        assert_eq!(range.high, 5.0);
        assert_eq!(range.width(), 7.5);

        assert!(range.contains(4.2));
        assert!(range.contains(-0.5));
        assert!(!range.contains(-12.5));
    }

    #[test]
    fn empty_value_range() {
        let mut range = ValueRange::empty();

        assert!(range.is_empty());
        assert!(!range.contains(2.0));
        assert!(!range.contains(0.0));
        assert_eq!(range.width(), 0.0);

        range.extend(2.0);

        assert!(range.contains(2.0));
        assert_eq!(range.low, 2.0);
        assert_eq!(range.high, 2.0);
    }

    #[test]
    fn from_samples() {
        // Samples do not have to be floating point
        let samples = &[1u16, 2, 4, 1000, 5, 0];

        let range = ValueRange::from_samples(samples.iter());

        assert_eq!(
            range,
            ValueRange {
                low: 0.0,
                high: 1000.0
            }
        )
    }
}
