//! Error types for interval construction and rounding-mode control.

use thiserror::Error;

use crate::interval::Interval;
use crate::round::RoundingMode;

/// Result type for interval operations.
pub type Result<T> = std::result::Result<T, IntervalError>;

/// Failure to switch the floating-point rounding direction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingModeError {
    #[error("fesetround({mode:?}) failed with code {code}")]
    Rejected { mode: RoundingMode, code: i32 },

    #[error("rounding mode {mode:?} is not available on this platform")]
    Unsupported { mode: RoundingMode },
}

/// Errors that can occur when building or combining intervals.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntervalError {
    #[error("invalid interval endpoints: lower {lo} and upper {hi}")]
    InvalidEndpoints { lo: f64, hi: f64 },

    #[error("invalid interval center {center} and radius {radius}")]
    InvalidCenterRadius { center: f64, radius: f64 },

    #[error("cannot intersect disjoint intervals {a} and {b}")]
    Disjoint { a: Interval, b: Interval },

    #[error(transparent)]
    RoundingMode(#[from] RoundingModeError),
}
