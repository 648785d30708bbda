//! Numeric helpers shared by extraction and aggregation.

/// Compute the arithmetic mean, or 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compute the sample standard deviation, with Bessel's correction.
///
/// Returns 0.0 when there are fewer than two values, since the spread of a single
/// measurement is not meaningful.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Compute `numerator / denominator` as a percentage.
///
/// Returns 0.0 when the denominator is zero, so that runs which recorded no events in
/// the denominator counter produce a well-defined rate instead of a NaN.
pub fn rate_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    numerator / denominator * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[20.0, 30.0]), 25.0);
    }

    #[test]
    fn sample_std_dev_uses_bessel_correction() {
        assert_eq!(sample_std_dev(&[90.0, 92.0, 94.0]), 2.0);
    }

    #[test]
    fn sample_std_dev_below_two_values_is_zero() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[42.0]), 0.0);
    }

    #[test]
    fn rate_percent_of_counters() {
        assert!((rate_percent(96_500.0, 1_096_500.0) - 8.800_729_594_163_247).abs() < 1e-12);
    }

    #[test]
    fn rate_percent_with_zero_denominator_is_zero() {
        assert_eq!(rate_percent(1_000.0, 0.0), 0.0);
    }
}
