use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cvscale_core::metric::{compute_cv, compute_cv_int, mean, population_std, relative_cv_error};
use cvscale_core::{SearchConfig, SearchResult, SearchTrace, ValueCount};
use log::info;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SeriesStats {
    pub mean: f64,
    pub std: f64,
    pub cv: f64,
}

#[derive(Debug, Serialize)]
pub struct SearchSummary {
    pub target_mean: f64,
    pub target_cv_error: f64,
    pub base_scale: f64,
    pub best_scale: f64,
    pub scale_multiplier: f64,
    pub candidates_examined: usize,
    pub met_target: bool,
}

#[derive(Debug, Serialize)]
pub struct ExactStats {
    pub cv: f64,
    pub cv_error: f64,
}

#[derive(Debug, Serialize)]
pub struct IntegerStats {
    /// `None` when every value rounded to zero.
    pub cv: Option<f64>,
    pub cv_error: f64,
    pub mean: f64,
    pub min: i64,
    pub max: i64,
}

/// Everything the orchestration layer says about one scaling run.
#[derive(Debug, Serialize)]
pub struct Report {
    pub column: String,
    pub rows: usize,
    pub original: SeriesStats,
    pub search: SearchSummary,
    pub exact: ExactStats,
    pub rounded: IntegerStats,
    pub distribution: Vec<ValueCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<SearchTrace>,
}

impl Report {
    pub fn build(
        column: &str,
        original: &[f64],
        config: &SearchConfig,
        result: &SearchResult,
        trace: Option<SearchTrace>,
    ) -> Result<Self> {
        let original_stats = SeriesStats {
            mean: mean(original)?,
            std: population_std(original)?,
            cv: result.original_cv,
        };

        let exact_cv = compute_cv(&result.exact_series(original))?;
        let ints = result.integer_series();
        let int_mean = ints.iter().map(|&v| v as f64).sum::<f64>() / ints.len() as f64;
        let distribution = result.distribution();

        Ok(Self {
            column: column.to_string(),
            rows: original.len(),
            original: original_stats,
            search: SearchSummary {
                target_mean: config.target_mean,
                target_cv_error: config.target_cv_error,
                base_scale: result.base_scale,
                best_scale: result.best_scale,
                scale_multiplier: result.best_candidate.scale_multiplier,
                candidates_examined: result.candidates_examined,
                met_target: result.met_target,
            },
            exact: ExactStats {
                cv: exact_cv,
                cv_error: relative_cv_error(exact_cv, result.original_cv),
            },
            rounded: IntegerStats {
                cv: compute_cv_int(ints).ok(),
                cv_error: result.cv_error(),
                mean: int_mean,
                min: distribution.min_value().unwrap_or_default(),
                max: distribution.max_value().unwrap_or_default(),
            },
            distribution: distribution.entries(),
            trace,
        })
    }

    /// Human-readable summary.
    pub fn render(&self) -> String {
        let mut s = String::new();
        let o = &self.original;
        let r = &self.search;
        let _ = writeln!(s, "Original data statistics ({} rows of `{}`):", self.rows, self.column);
        let _ = writeln!(s, "- Mean: {:.4}", o.mean);
        let _ = writeln!(s, "- Standard Deviation: {:.4}", o.std);
        let _ = writeln!(s, "- Coefficient of Variation: {:.6}", o.cv);
        let _ = writeln!(s);
        let _ = writeln!(s, "Search:");
        let _ = writeln!(s, "- Base scaling for target mean {:.2}: {:.6}", r.target_mean, r.base_scale);
        let _ = writeln!(s, "- Optimal scaling factor: {:.6} (multiplier {:.3})", r.best_scale, r.scale_multiplier);
        let _ = writeln!(s, "- Scales explored: {}", r.candidates_examined);
        let _ = writeln!(
            s,
            "- Target {}: CV error {:.6}% vs tolerance {:.6}%",
            if r.met_target { "met" } else { "NOT met" },
            self.rounded.cv_error * 100.0,
            r.target_cv_error * 100.0
        );
        let _ = writeln!(s);
        let _ = writeln!(s, "Final statistics:");
        let _ = writeln!(s, "- Exact Scaled CV: {:.6} (Error: {:.6}%)", self.exact.cv, self.exact.cv_error * 100.0);
        match self.rounded.cv {
            Some(cv) => {
                let _ = writeln!(s, "- Rounded CV: {:.6} (Error: {:.6}%)", cv, self.rounded.cv_error * 100.0);
            }
            None => {
                let _ = writeln!(s, "- Rounded CV: undefined (all values rounded to zero)");
            }
        }
        let _ = writeln!(s, "- Mean of optimized data: {:.4}", self.rounded.mean);
        let _ = writeln!(s, "- Range: {} to {}", self.rounded.min, self.rounded.max);
        let _ = writeln!(s);
        let _ = writeln!(s, "Value Distribution:");
        for entry in &self.distribution {
            let _ = writeln!(s, "- Value {}: {} occurrences ({:.1}%)", entry.value, entry.count, entry.percentage);
        }
        s
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize diagnostics")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write diagnostics to {}", path.display()))?;
        info!("Diagnostics saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvscale_core::ScaleSearch;

    const TEXTBOOK: [f64; 8] = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    fn textbook_report() -> Report {
        let config = SearchConfig {
            target_cv_error: 0.05,
            min_multiplier: 1.0,
            max_multiplier: 2.0,
            step: 0.1,
            ..SearchConfig::default()
        };
        let result = ScaleSearch::new(config).run(&TEXTBOOK).unwrap();
        Report::build("demand", &TEXTBOOK, &config, &result, None).unwrap()
    }

    #[test]
    fn test_build_textbook() {
        let report = textbook_report();
        assert_eq!(report.original.mean, 5.0);
        assert_eq!(report.original.std, 2.0);
        assert!(report.search.met_target);
        // Exact scaling never changes the CV.
        assert!(report.exact.cv_error < 1e-12);
        // [2, 5, 5, 5, 6, 6, 8, 11]
        assert_eq!(report.rounded.mean, 6.0);
        assert_eq!((report.rounded.min, report.rounded.max), (2, 11));
        assert_eq!(report.distribution.iter().map(|e| e.count).sum::<usize>(), 8);
    }

    #[test]
    fn test_render_mentions_distribution() {
        let text = textbook_report().render();
        assert!(text.contains("Scales explored: 1"));
        assert!(text.contains("- Value 5: 3 occurrences (37.5%)"));
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(textbook_report()).unwrap();
        assert_eq!(value["search"]["candidates_examined"], 1);
        assert_eq!(value["distribution"][0]["value"], 2);
        assert!(value.get("trace").is_none());
    }
}
