//! Statistical primitives shared by the stats engine and the simulator.

use crate::error::AnalyticsError;

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (divisor `n - 1`) around a precomputed mean.
///
/// Defined as `0.0` when there are fewer than two values.
pub fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Nearest-rank percentile over an ascending-sorted slice: the element at
/// `floor(len * p)`.
///
/// `p` must lie in `[0, 1)` so the index always falls inside the slice.
pub fn percentile(sorted: &[f64], p: f64) -> Result<f64, AnalyticsError> {
    if sorted.is_empty() {
        return Err(AnalyticsError::NotEnoughData(
            "percentile of an empty sample".to_string(),
        ));
    }
    if !(0.0..1.0).contains(&p) {
        return Err(AnalyticsError::InvalidArgument(
            "p".to_string(),
            format!("{} is outside [0, 1)", p),
        ));
    }
    let index = (sorted.len() as f64 * p).floor() as usize;
    Ok(sorted[index])
}

/// Drops values outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`, keeping the input order.
///
/// Quartiles are nearest-rank picks from a sorted copy. Series shorter than four
/// values are returned unchanged.
pub fn remove_outliers(values: &[f64]) -> Vec<f64> {
    if values.len() < 4 {
        return values.to_vec();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let q1 = sorted[(n * 0.25).floor() as usize];
    let q3 = sorted[(n * 0.75).floor() as usize];
    let iqr = q3 - q1;

    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;

    values
        .iter()
        .copied()
        .filter(|v| *v >= lower && *v <= upper)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [f64; 8] = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    #[test]
    fn sample_std_dev_uses_n_minus_one() {
        let m = mean(&SAMPLE);
        assert_eq!(m, 5.0);

        let sample = sample_std_dev(&SAMPLE, m);
        assert!((sample - 2.138_089_935_299_395).abs() < 1e-12);

        // the population figure for the same data is exactly 2
        assert!((sample - 2.0).abs() > 0.1);
    }

    #[test]
    fn std_dev_is_zero_below_two_values() {
        assert_eq!(sample_std_dev(&[], 0.0), 0.0);
        assert_eq!(sample_std_dev(&[42.0], 42.0), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn percentile_is_nearest_rank() {
        let sorted: Vec<f64> = (0..100).map(f64::from).collect();
        assert_eq!(percentile(&sorted, 0.05).unwrap(), 5.0);
        assert_eq!(percentile(&sorted, 0.5).unwrap(), 50.0);
        assert_eq!(percentile(&sorted, 0.95).unwrap(), 95.0);
        assert_eq!(percentile(&[3.0, 7.0, 9.0], 0.5).unwrap(), 7.0);
    }

    #[test]
    fn percentile_rejects_empty_and_out_of_range() {
        assert!(matches!(
            percentile(&[], 0.5),
            Err(AnalyticsError::NotEnoughData(_))
        ));
        assert!(matches!(
            percentile(&[1.0], 1.0),
            Err(AnalyticsError::InvalidArgument(_, _))
        ));
        assert!(percentile(&[1.0], -0.1).is_err());
    }

    #[test]
    fn removes_single_spike() {
        let values = [100.0, 102.0, 98.0, 101.0, 99.0, 1000.0, 103.0];
        let cleaned = remove_outliers(&values);
        assert_eq!(cleaned, vec![100.0, 102.0, 98.0, 101.0, 99.0, 103.0]);
    }

    #[test]
    fn short_series_are_not_filtered() {
        let values = [1.0, 1000.0, 2.0];
        assert_eq!(remove_outliers(&values), values.to_vec());
    }

    #[test]
    fn flat_series_is_kept_whole() {
        let values = [5.0; 6];
        assert_eq!(remove_outliers(&values), values.to_vec());
    }
}
