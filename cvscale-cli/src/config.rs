use std::path::PathBuf;

use clap::Parser;
use cvscale_core::search::{
    DEFAULT_MAX_MULTIPLIER, DEFAULT_MIN_MULTIPLIER, DEFAULT_STEP, DEFAULT_TARGET_CV_ERROR,
    DEFAULT_TARGET_MEAN,
};
use cvscale_core::SearchConfig;

/// Scale a numeric CSV column to integers with a target mean while preserving its CV.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Source CSV file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Destination CSV file (source table plus the two derived columns)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Header of the column to scale
    #[arg(short, long, default_value = "FL US Equity")]
    pub column: String,

    #[arg(long, default_value_t = DEFAULT_TARGET_MEAN)]
    pub target_mean: f64,

    /// Maximum relative CV error (0.01 = 1%)
    #[arg(long, default_value_t = DEFAULT_TARGET_CV_ERROR)]
    pub target_cv_error: f64,

    #[arg(long, default_value_t = DEFAULT_MIN_MULTIPLIER)]
    pub min_multiplier: f64,

    /// Exclusive
    #[arg(long, default_value_t = DEFAULT_MAX_MULTIPLIER)]
    pub max_multiplier: f64,

    #[arg(long, default_value_t = DEFAULT_STEP)]
    pub step: f64,

    #[arg(long, default_value = "Precision Scaled (Exact)")]
    pub exact_column: String,

    #[arg(long, default_value = "Precision Scaled (Integer)")]
    pub integer_column: String,

    /// Also write the diagnostics report as JSON
    #[arg(long)]
    pub diagnostics_json: Option<PathBuf>,

    /// Include the search trace in the JSON diagnostics
    #[arg(long)]
    pub trace: bool,

    /// Fail instead of writing a best-effort result when the tolerance is not met
    #[arg(long)]
    pub require_target: bool,
}

impl Args {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            target_mean: self.target_mean,
            target_cv_error: self.target_cv_error,
            min_multiplier: self.min_multiplier,
            max_multiplier: self.max_multiplier,
            step: self.step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_core() {
        let args = Args::parse_from(["cvscale", "-i", "in.csv", "-o", "out.csv"]);
        assert_eq!(args.search_config(), SearchConfig::default());
        assert_eq!(args.column, "FL US Equity");
        assert!(args.diagnostics_json.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "cvscale", "-i", "a.csv", "-o", "b.csv", "--column", "Close",
            "--target-mean", "12", "--step", "0.01", "--require-target",
        ]);
        let config = args.search_config();
        assert_eq!(config.target_mean, 12.0);
        assert_eq!(config.step, 0.01);
        assert!(args.require_target);
    }
}
