/// Integer Quantizer
///
/// Maps a scaled real-valued series onto the integers, one element at a time.
/// Ties (fractional part exactly 0.5) round to the nearest even integer, so
/// `cv_error` is reproducible at tie boundaries.
pub struct Quantizer;

impl Quantizer {
    /// Round-half-to-even of a single value.
    /// Out-of-range magnitudes saturate at `i64::MIN`/`i64::MAX`; NaN maps to 0.
    #[inline]
    pub fn round_value(x: f64) -> i64 {
        x.round_ties_even() as i64
    }

    /// Quantize a whole series. Output has the same length and order.
    pub fn round(series: &[f64]) -> Vec<i64> {
        series.iter().map(|&x| Self::round_value(x)).collect()
    }

    /// Scale then quantize in a single pass, without materialising the scaled series.
    pub fn scale_and_round(series: &[f64], factor: f64) -> Vec<i64> {
        series.iter().map(|&x| Self::round_value(x * factor)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_round_to_even() {
        assert_eq!(Quantizer::round(&[0.5, 1.5, 2.5, 3.5, -0.5, -2.5]), vec![0, 2, 2, 4, 0, -2]);
    }

    #[test]
    fn test_nearest_and_order() {
        let out = Quantizer::round(&[7.49, 0.51, 2.2, -1.7]);
        assert_eq!(out, vec![7, 1, 2, -2]);
    }

    #[test]
    fn test_scale_and_round_matches_two_step() {
        let s = [1.25, 3.75, 0.1, 9.9];
        let scaled: Vec<f64> = s.iter().map(|x| x * 2.0).collect();
        assert_eq!(Quantizer::scale_and_round(&s, 2.0), Quantizer::round(&scaled));
    }

    #[test]
    fn test_saturation() {
        assert_eq!(Quantizer::round_value(1e30), i64::MAX);
        assert_eq!(Quantizer::round_value(-1e30), i64::MIN);
    }
}
