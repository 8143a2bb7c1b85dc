use thiserror::Error;

/// Precondition failures of the metric calculator and the scale search.
///
/// Not meeting the CV tolerance is not an error: it is reported through
/// `SearchResult::met_target`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    #[error("Input series is empty")]
    EmptyInput,
    #[error("Coefficient of variation undefined: series mean is {mean} (must be > 0)")]
    ZeroMean { mean: f64 },
    #[error("Original series has zero dispersion (CV = 0); relative CV error is undefined")]
    ZeroDispersion,
    #[error("Invalid multiplier range: min={min}, max={max}, step={step}")]
    InvalidRange { min: f64, max: f64, step: f64 },
    #[error("Target CV error must be > 0, got {0}")]
    InvalidTolerance(f64),
    #[error("Target mean must be > 0, got {0}")]
    InvalidTargetMean(f64),
    #[error("Non-finite value at index {index}: {value}")]
    NonFinite { index: usize, value: f64 },
    #[error("Non-finite search parameter `{name}`: {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
}

impl ScaleError {
    /// True for the two variants that mean "the CV denominator is undefined".
    pub fn is_zero_mean(&self) -> bool {
        matches!(self, ScaleError::ZeroMean { .. } | ScaleError::ZeroDispersion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_mean_kind_covers_both_variants() {
        assert!(ScaleError::ZeroMean { mean: 0.0 }.is_zero_mean());
        assert!(ScaleError::ZeroDispersion.is_zero_mean());
        assert!(!ScaleError::EmptyInput.is_zero_mean());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = ScaleError::InvalidRange { min: 2.0, max: 1.0, step: 0.1 };
        assert_eq!(err.to_string(), "Invalid multiplier range: min=2, max=1, step=0.1");
    }
}
