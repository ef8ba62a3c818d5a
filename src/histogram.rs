/// Fixed-width frequency binning for the point-margin chart.
///
/// The bin domain is derived from the sample min/max; callers render the
/// result directly, so an empty input yields an empty vector rather than a
/// zero-width chart.
pub const DEFAULT_BIN_COUNT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

pub fn bin(samples: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if samples.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in samples {
        min = min.min(v);
        max = max.max(v);
    }

    // Zero-variance input would give a zero bin width; fall back to 1.
    let width = if max > min {
        (max - min) / bin_count as f64
    } else {
        1.0
    };

    let mut counts = vec![0u64; bin_count];
    let last = (bin_count - 1) as f64;
    for &v in samples {
        // The clamp keeps the maximum sample in the last bin instead of
        // overflowing by one on floating-point rounding.
        let idx = ((v - min) / width).floor().clamp(0.0, last) as usize;
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(bins: &[HistogramBin]) -> Vec<u64> {
        bins.iter().map(|b| b.count).collect()
    }

    #[test]
    fn empty_input_produces_no_bins() {
        assert!(bin(&[], DEFAULT_BIN_COUNT).is_empty());
    }

    #[test]
    fn counts_cover_every_sample() {
        let samples: Vec<f64> = (0..257).map(|i| (i % 53) as f64 - 21.0).collect();
        let bins = bin(&samples, DEFAULT_BIN_COUNT);
        assert_eq!(bins.len(), DEFAULT_BIN_COUNT);
        let total: u64 = bins.iter().map(|b| b.count).sum();
        assert_eq!(total as usize, samples.len());
    }

    #[test]
    fn binning_is_order_independent() {
        let forward = vec![-14.0, -3.0, 0.0, 2.0, 2.0, 7.0, 21.0, 35.0];
        let mut shuffled = forward.clone();
        shuffled.reverse();
        shuffled.swap(1, 5);
        assert_eq!(
            counts(&bin(&forward, DEFAULT_BIN_COUNT)),
            counts(&bin(&shuffled, DEFAULT_BIN_COUNT))
        );
    }

    #[test]
    fn maximum_sample_lands_in_last_bin() {
        let samples = vec![-10.0, -2.5, 0.0, 4.0, 17.0];
        let bins = bin(&samples, DEFAULT_BIN_COUNT);
        assert_eq!(bins.last().map(|b| b.count), Some(1));
    }

    #[test]
    fn zero_variance_input_populates_a_single_bin() {
        let bins = bin(&[5.0, 5.0, 5.0], DEFAULT_BIN_COUNT);
        let total: u64 = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 3);
        let populated = bins.iter().filter(|b| b.count > 0).count();
        assert_eq!(populated, 1);
        assert_eq!(bins[0].count, 3);
        assert!((bins[0].upper - bins[0].lower - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bounds_follow_the_sample_domain() {
        let bins = bin(&[-20.0, 20.0], 4);
        assert!((bins[0].lower + 20.0).abs() < f64::EPSILON);
        assert!((bins[3].upper - 20.0).abs() < f64::EPSILON);
        assert!((bins[1].lower + 10.0).abs() < f64::EPSILON);
    }
}
