use super::{SampleFormat, Volume};

/// Number of bins, one per 8-bit value
pub const HISTOGRAM_BINS: usize = 256;

/// Sample distribution of a volume, for picking a density window.
///
/// Zero samples (empty space) are not counted.
/// Bin heights are percentages of the tallest bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<f32>,
}

impl Histogram {
    pub fn from_volume<V>(volume: &V, format: SampleFormat) -> Histogram
    where
        V: Volume + ?Sized,
    {
        let size = volume.get_size();
        let dataset_max = volume.get_range().high;

        let mut counts = vec![0_u64; HISTOGRAM_BINS];

        for z in 0..size.z {
            for y in 0..size.y {
                for x in 0..size.x {
                    let sample = volume.get_data(x, y, z).unwrap_or(0.0);
                    let bin = match format {
                        SampleFormat::U8 => sample.round(),
                        // Wider data is rescaled so the dataset maximum lands in the last bin
                        SampleFormat::U16 if dataset_max > 0.0 => {
                            (sample * 255.0 / dataset_max).round()
                        }
                        SampleFormat::U16 => 0.0,
                    };
                    let bin = (bin.max(0.0) as usize).min(HISTOGRAM_BINS - 1);
                    if bin == 0 {
                        continue;
                    }
                    counts[bin] += 1;
                }
            }
        }

        let tallest = counts.iter().copied().max().unwrap_or(0);
        let bins = counts
            .iter()
            .map(|&c| {
                if tallest == 0 {
                    0.0
                } else {
                    c as f32 * 100.0 / tallest as f32
                }
            })
            .collect();

        Histogram { bins }
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Index of the tallest bin, `None` for an all-zero volume.
    pub fn peak(&self) -> Option<usize> {
        self.bins
            .iter()
            .enumerate()
            .filter(|(_, &h)| h > 0.0)
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod test {

    use nalgebra::vector;

    use super::*;
    use crate::volumetric::LinearVolume;

    #[test]
    fn skips_zero_and_normalizes() {
        let volume = LinearVolume::from_fn(
            vector![4, 1, 1],
            vector![1.0, 1.0, 1.0],
            SampleFormat::U8,
            |x, _, _| [0.0, 10.0, 10.0, 200.0][x],
        )
        .unwrap();

        let hist = Histogram::from_volume(&volume, SampleFormat::U8);

        assert_eq!(hist.bins().len(), HISTOGRAM_BINS);
        assert_eq!(hist.bins()[0], 0.0);
        assert_eq!(hist.bins()[10], 100.0);
        assert_eq!(hist.bins()[200], 50.0);
        assert_eq!(hist.peak(), Some(10));
    }

    #[test]
    fn wide_samples_rescaled() {
        let volume = LinearVolume::from_fn(
            vector![2, 1, 1],
            vector![1.0, 1.0, 1.0],
            SampleFormat::U16,
            |x, _, _| [2000.0, 4000.0][x],
        )
        .unwrap();

        let hist = Histogram::from_volume(&volume, SampleFormat::U16);

        // 2000 * 255 / 4000 = 127.5, rounds away from zero
        assert_eq!(hist.bins()[128], 100.0);
        assert_eq!(hist.bins()[255], 100.0);
    }

    #[test]
    fn empty_volume_has_no_peak() {
        let volume = LinearVolume::from_fn(
            vector![2, 2, 2],
            vector![1.0, 1.0, 1.0],
            SampleFormat::U8,
            |_, _, _| 0.0,
        )
        .unwrap();

        let hist = Histogram::from_volume(&volume, SampleFormat::U8);

        assert_eq!(hist.peak(), None);
        assert!(hist.bins().iter().all(|&h| h == 0.0));
    }
}
