pub mod grid;
pub mod trace;

use crate::distribution::ValueDistribution;
use crate::error::ScaleError;
use crate::metric::{compute_cv, compute_cv_int, mean, relative_cv_error};
use crate::quantize::Quantizer;
use grid::MultiplierGrid;
use log::debug;
use serde::Serialize;
use trace::{SearchObserver, SearchTrace, TraceEvent};

pub const DEFAULT_TARGET_MEAN: f64 = 6.0;
pub const DEFAULT_TARGET_CV_ERROR: f64 = 0.01;
pub const DEFAULT_MIN_MULTIPLIER: f64 = 1.0;
pub const DEFAULT_MAX_MULTIPLIER: f64 = 20.0;
pub const DEFAULT_STEP: f64 = 0.005;

/// Parameters of one scale search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchConfig {
    pub target_mean: f64,
    /// Maximum accepted relative CV deviation (0.01 = 1%).
    pub target_cv_error: f64,
    pub min_multiplier: f64,
    /// Exclusive upper bound.
    pub max_multiplier: f64,
    pub step: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target_mean: DEFAULT_TARGET_MEAN,
            target_cv_error: DEFAULT_TARGET_CV_ERROR,
            min_multiplier: DEFAULT_MIN_MULTIPLIER,
            max_multiplier: DEFAULT_MAX_MULTIPLIER,
            step: DEFAULT_STEP,
        }
    }
}

impl SearchConfig {
    /// Checks every parameter and builds the multiplier grid.
    pub fn grid(&self) -> Result<MultiplierGrid, ScaleError> {
        let params = [
            ("target_mean", self.target_mean),
            ("target_cv_error", self.target_cv_error),
            ("min_multiplier", self.min_multiplier),
            ("max_multiplier", self.max_multiplier),
            ("step", self.step),
        ];
        if let Some(&(name, value)) = params.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ScaleError::NonFiniteParameter { name, value });
        }
        if self.target_cv_error <= 0.0 {
            return Err(ScaleError::InvalidTolerance(self.target_cv_error));
        }
        if self.target_mean <= 0.0 {
            return Err(ScaleError::InvalidTargetMean(self.target_mean));
        }
        MultiplierGrid::new(self.min_multiplier, self.max_multiplier, self.step)
    }
}

/// One evaluated point of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingCandidate {
    pub scale_multiplier: f64,
    /// `base_scale * scale_multiplier`
    pub scale_factor: f64,
    pub integer_series: Vec<i64>,
    /// Relative CV deviation from the original series. `+inf` if the quantized
    /// series has no positive mean.
    pub cv_error: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub best_scale: f64,
    pub best_candidate: ScalingCandidate,
    /// Grid points visited, including the one that triggered early exit.
    pub candidates_examined: usize,
    /// `false` means the tolerance was never reached and `best_candidate` is the
    /// best effort over the whole grid.
    pub met_target: bool,
    pub original_cv: f64,
    pub base_scale: f64,
}

impl SearchResult {
    /// The unrounded series `original * best_scale`.
    pub fn exact_series(&self, original: &[f64]) -> Vec<f64> {
        original.iter().map(|&x| x * self.best_scale).collect()
    }

    pub fn integer_series(&self) -> &[i64] {
        &self.best_candidate.integer_series
    }

    pub fn cv_error(&self) -> f64 {
        self.best_candidate.cv_error
    }

    pub fn distribution(&self) -> ValueDistribution {
        ValueDistribution::from_series(&self.best_candidate.integer_series)
    }
}

/// Bounded grid search for a CV-preserving integer scaling.
///
/// # Logic
/// Walks the multiplier grid in increasing order. Each point scales the series
/// so its mean lands on `target_mean * multiplier`, rounds it, and scores the
/// relative CV error. The first point within tolerance wins immediately; this is
/// a greedy scan, not a global minimisation. Otherwise the lowest error wins,
/// with ties kept by the earliest point.
///
/// The search is pure: no shared state, so independent searches may run on
/// separate threads freely.
pub struct ScaleSearch {
    config: SearchConfig,
}

impl ScaleSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn run(&self, series: &[f64]) -> Result<SearchResult, ScaleError> {
        self.run_with(series, &mut ())
    }

    /// Like `run`, also returning the ordered narration of the scan.
    pub fn run_traced(&self, series: &[f64]) -> Result<(SearchResult, SearchTrace), ScaleError> {
        let mut trace = SearchTrace::new();
        let result = self.run_with(series, &mut trace)?;
        Ok((result, trace))
    }

    pub fn run_with<O: SearchObserver>(
        &self,
        series: &[f64],
        observer: &mut O,
    ) -> Result<SearchResult, ScaleError> {
        let grid = self.config.grid()?;
        validate_series(series)?;

        let original_cv = compute_cv(series)?;
        if original_cv == 0.0 {
            return Err(ScaleError::ZeroDispersion);
        }
        let base_scale = self.config.target_mean / mean(series)?;

        debug!(
            "Scale search: n={}, original_cv={:.6}, base_scale={:.6}, grid={} points",
            series.len(),
            original_cv,
            base_scale,
            grid.len()
        );
        observer.on_event(TraceEvent::Started {
            original_cv,
            base_scale,
            grid_points: grid.len(),
        });

        let mut best: Option<ScalingCandidate> = None;
        let mut examined = 0;
        let mut met_target = false;

        for multiplier in grid.iter() {
            examined += 1;
            let (candidate, quantized_cv) = evaluate(series, base_scale, original_cv, multiplier);

            if candidate.cv_error <= self.config.target_cv_error {
                observer.on_event(TraceEvent::TargetMet {
                    examined,
                    scale_factor: candidate.scale_factor,
                    cv_error: candidate.cv_error,
                });
                best = Some(candidate);
                met_target = true;
                break;
            }

            // Strict less-than: on equal error the earlier multiplier stays.
            let improves = best
                .as_ref()
                .map_or(true, |b| candidate.cv_error < b.cv_error);
            if improves {
                log::trace!(
                    "New best at #{}: scale={:.6}, error={:.6}",
                    examined,
                    candidate.scale_factor,
                    candidate.cv_error
                );
                observer.on_event(TraceEvent::NewBest {
                    examined,
                    scale_multiplier: candidate.scale_multiplier,
                    scale_factor: candidate.scale_factor,
                    quantized_cv,
                    cv_error: candidate.cv_error,
                });
                best = Some(candidate);
            }
        }

        let best_candidate = best.ok_or(ScaleError::InvalidRange {
            min: self.config.min_multiplier,
            max: self.config.max_multiplier,
            step: self.config.step,
        })?;

        if !met_target {
            observer.on_event(TraceEvent::Exhausted {
                examined,
                best_scale: best_candidate.scale_factor,
                best_cv_error: best_candidate.cv_error,
            });
        }
        debug!(
            "Scale search finished: scale={:.6}, error={:.6}, examined={}, met_target={}",
            best_candidate.scale_factor, best_candidate.cv_error, examined, met_target
        );

        Ok(SearchResult {
            best_scale: best_candidate.scale_factor,
            best_candidate,
            candidates_examined: examined,
            met_target,
            original_cv,
            base_scale,
        })
    }
}

/// Runs a search with explicit parameters. See `ScaleSearch`.
pub fn search(
    original_series: &[f64],
    target_mean: f64,
    target_cv_error: f64,
    min_multiplier: f64,
    max_multiplier: f64,
    step: f64,
) -> Result<SearchResult, ScaleError> {
    ScaleSearch::new(SearchConfig {
        target_mean,
        target_cv_error,
        min_multiplier,
        max_multiplier,
        step,
    })
    .run(original_series)
}

fn validate_series(series: &[f64]) -> Result<(), ScaleError> {
    if series.is_empty() {
        return Err(ScaleError::EmptyInput);
    }
    if let Some((index, &value)) = series.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ScaleError::NonFinite { index, value });
    }
    Ok(())
}

fn evaluate(
    series: &[f64],
    base_scale: f64,
    original_cv: f64,
    scale_multiplier: f64,
) -> (ScalingCandidate, Option<f64>) {
    let scale_factor = base_scale * scale_multiplier;
    let integer_series = Quantizer::scale_and_round(series, scale_factor);
    let quantized_cv = compute_cv_int(&integer_series).ok();
    let cv_error = quantized_cv.map_or(f64::INFINITY, |cv| relative_cv_error(cv, original_cv));

    (
        ScalingCandidate {
            scale_multiplier,
            scale_factor,
            integer_series,
            cv_error,
        },
        quantized_cv,
    )
}
