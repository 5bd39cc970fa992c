//! Double-precision interval arithmetic with outward rounding.
//!
//! An [`Interval`] stores its lower bound and the *negation* of its upper
//! bound. With the processor rounding toward negative infinity, every
//! operation then rounds the lower bound down and the upper bound up, so the
//! computed interval always contains the exact result. The rounding
//! direction is thread state; [`RoundingGuard`] sets it for a lexical scope.
//!
//! ```no_run
//! use dbl_ival::{Interval, RoundingGuard};
//!
//! let _guard = RoundingGuard::downward()?;
//! let third = Interval::from(1) / Interval::from(3);
//! assert!(third.lo() < third.hi());
//! # Ok::<(), dbl_ival::RoundingModeError>(())
//! ```

mod arith;
mod error;
mod interval;
mod precision;
mod relation;
mod round;

pub use error::{IntervalError, Result, RoundingModeError};
pub use interval::Interval;
pub use precision::{ExactReal, FloatPrecision};
pub use relation::{Position, Relation, RelationSet, Sign};
pub use round::{round_down, RoundingGuard, RoundingMode};
