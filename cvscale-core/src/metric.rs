use crate::error::ScaleError;

/// Arithmetic mean. Returns `EmptyInput` for an empty slice.
pub fn mean(series: &[f64]) -> Result<f64, ScaleError> {
    if series.is_empty() {
        return Err(ScaleError::EmptyInput);
    }
    Ok(series.iter().sum::<f64>() / series.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std(series: &[f64]) -> Result<f64, ScaleError> {
    let mu = mean(series)?;
    Ok(spread_around(series.iter().copied(), mu, series.len()))
}

/// Coefficient of Variation: population std / mean.
///
/// # Errors
/// * `EmptyInput` if the series is empty.
/// * `ZeroMean` if the mean is not strictly positive. The ratio is undefined
///   there and is never substituted with 0.
pub fn compute_cv(series: &[f64]) -> Result<f64, ScaleError> {
    let mu = mean(series)?;
    cv_with_mean(series.iter().copied(), mu, series.len())
}

/// `compute_cv` for an already quantized series.
pub fn compute_cv_int(series: &[i64]) -> Result<f64, ScaleError> {
    if series.is_empty() {
        return Err(ScaleError::EmptyInput);
    }
    let n = series.len();
    let mu = series.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    cv_with_mean(series.iter().map(|&v| v as f64), mu, n)
}

/// Relative deviation of `cv` from `reference_cv`. Caller guarantees `reference_cv > 0`.
#[inline]
pub fn relative_cv_error(cv: f64, reference_cv: f64) -> f64 {
    (cv - reference_cv).abs() / reference_cv
}

fn cv_with_mean<I>(values: I, mu: f64, n: usize) -> Result<f64, ScaleError>
where
    I: Iterator<Item = f64>,
{
    if mu.is_nan() || mu <= 0.0 {
        return Err(ScaleError::ZeroMean { mean: mu });
    }
    Ok(spread_around(values, mu, n) / mu)
}

fn spread_around<I>(values: I, mu: f64, n: usize) -> f64
where
    I: Iterator<Item = f64>,
{
    let sum_sq: f64 = values.map(|x| (x - mu) * (x - mu)).sum();
    (sum_sq / n as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textbook_series() {
        let s = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&s).unwrap(), 5.0);
        assert_eq!(population_std(&s).unwrap(), 2.0);
        assert!((compute_cv(&s).unwrap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_int_and_float_agree() {
        let ints = [3i64, 7, 7, 19, 1];
        let floats: Vec<f64> = ints.iter().map(|&v| v as f64).collect();
        let diff = (compute_cv_int(&ints).unwrap() - compute_cv(&floats).unwrap()).abs();
        assert!(diff < 1e-12);
    }

    #[test]
    fn test_constant_series_has_zero_cv() {
        assert_eq!(compute_cv(&[3.0, 3.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_and_negative_mean_are_errors() {
        assert_eq!(compute_cv(&[-1.0, 1.0]), Err(ScaleError::ZeroMean { mean: 0.0 }));
        assert!(matches!(compute_cv(&[-3.0, -1.0]), Err(ScaleError::ZeroMean { .. })));
        assert!(matches!(compute_cv_int(&[0, 0, 0]), Err(ScaleError::ZeroMean { .. })));
    }

    #[test]
    fn test_empty_is_error() {
        assert_eq!(compute_cv(&[]), Err(ScaleError::EmptyInput));
        assert_eq!(compute_cv_int(&[]), Err(ScaleError::EmptyInput));
    }

    #[test]
    fn test_relative_error() {
        assert!((relative_cv_error(0.42, 0.4) - 0.05).abs() < 1e-12);
        assert!((relative_cv_error(0.38, 0.4) - 0.05).abs() < 1e-12);
    }
}
