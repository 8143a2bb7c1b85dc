//! cvscale core: CV-preserving integer scaling.
//!
//! Converts a positive real-valued series into integers that hit a target mean
//! while keeping the coefficient of variation within a relative tolerance.
//! Everything here is pure and synchronous; I/O lives in `cvscale-io`.

pub mod distribution;
pub mod error;
pub mod metric;
pub mod quantize;
pub mod search;

pub use distribution::{ValueCount, ValueDistribution};
pub use error::ScaleError;
pub use metric::{compute_cv, compute_cv_int};
pub use quantize::Quantizer;
pub use search::trace::{SearchObserver, SearchTrace, TraceEvent};
pub use search::{search, ScaleSearch, ScalingCandidate, SearchConfig, SearchResult};
