use std::cmp::Ordering;
use std::fmt;

use float_next_after::NextAfter;
use log::trace;
use rug::{Integer, Rational};

use crate::error::{IntervalError, Result};
use crate::precision::{ExactReal, FloatPrecision};
use crate::round::{debug_assert_round_down, opaque};

/// A closed, non-empty interval `[lo, hi]` with binary64 endpoints.
///
/// The upper bound is stored negated, so that rounding every computation
/// toward negative infinity rounds the lower bound down and the upper bound
/// up. Apart from constructors taking doubles or exact numbers, every
/// operation requires a downward [`RoundingGuard`](crate::RoundingGuard)
/// on the calling thread.
///
/// Endpoints are finite or infinite. An interval with a NaN endpoint is
/// "not an interval" (see [`Interval::is_nai`]); arithmetic propagates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub(crate) lo_pos: f64,
    pub(crate) hi_neg: f64,
}

impl Interval {
    pub const ZERO: Interval = Interval {
        lo_pos: 0.0,
        hi_neg: -0.0,
    };

    pub const ENTIRE: Interval = Interval {
        lo_pos: f64::NEG_INFINITY,
        hi_neg: f64::NEG_INFINITY,
    };

    #[inline]
    pub(crate) fn raw(lo_pos: f64, hi_neg: f64) -> Interval {
        debug_assert!(
            !(lo_pos > -hi_neg),
            "empty interval [{}, {}]",
            lo_pos,
            -hi_neg
        );
        Interval { lo_pos, hi_neg }
    }

    /// Both fields passed through an optimization barrier. Every operation
    /// that relies on the rounding mode reads its operands through this.
    #[inline(always)]
    pub(crate) fn opaque(self) -> Interval {
        Interval {
            lo_pos: opaque(self.lo_pos),
            hi_neg: opaque(self.hi_neg),
        }
    }

    /// Like [`Interval::raw`], for fields computed under directed rounding:
    /// pins the computation before any later change of rounding mode.
    #[inline(always)]
    pub(crate) fn rounded(lo_pos: f64, hi_neg: f64) -> Interval {
        Interval::raw(opaque(lo_pos), opaque(hi_neg))
    }

    /// `d` widened by one ulp away from zero on the side `sign` says the
    /// true value lies.
    fn widened(d: f64, sign: Ordering) -> Interval {
        let lo = match sign {
            Ordering::Less => d.next_after(f64::NEG_INFINITY),
            _ => d,
        };
        let hi = match sign {
            Ordering::Greater => d.next_after(f64::INFINITY),
            _ => d,
        };
        Interval::raw(lo, -hi)
    }

    /// The point interval `[d, d]`. A NaN yields a NaI.
    pub fn point(d: f64) -> Interval {
        Interval { lo_pos: d, hi_neg: -d }
    }

    /// `[lo, hi]`, with `lo <= hi` checked.
    pub fn from_endpoints(lo: f64, hi: f64) -> Result<Interval> {
        if !(lo <= hi) {
            return Err(IntervalError::InvalidEndpoints { lo, hi });
        }
        Ok(Interval::raw(lo, -hi))
    }

    /// `[center - radius, center + radius]`, rounded outward. The center
    /// must be finite; the radius may be infinite.
    pub fn from_center_radius(center: f64, radius: f64) -> Result<Interval> {
        if !center.is_finite() || !(radius >= 0.0) {
            return Err(IntervalError::InvalidCenterRadius { center, radius });
        }
        debug_assert_round_down();
        let (c, r) = (opaque(center), opaque(radius));
        Ok(Interval::rounded(c - r, -c - r))
    }

    /// Smallest interval with binary64 endpoints known to contain `v`.
    ///
    /// Exact when `v` fits in the binary64 significand, otherwise the
    /// truncated value is widened by one ulp away from zero.
    pub fn from_exact<T: ExactReal + ?Sized>(v: &T) -> Interval {
        let d = v.to_f64_toward_zero();
        match v.float_precision() {
            Some(prec) if prec <= f64::MANTISSA_DIGITS => Interval::point(d),
            _ => {
                trace!("widening inexact conversion around {}", d);
                Interval::widened(d, v.sign())
            }
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo_pos
    }

    pub fn hi(&self) -> f64 {
        -self.hi_neg
    }

    pub fn inf(&self) -> f64 {
        self.lo()
    }

    pub fn sup(&self) -> f64 {
        self.hi()
    }

    /// Never true for an interval built through this crate's API.
    pub fn is_empty(&self) -> bool {
        self.lo() > self.hi()
    }

    /// Not-an-interval: at least one endpoint is NaN.
    pub fn is_nai(&self) -> bool {
        self.lo_pos.is_nan() || self.hi_neg.is_nan()
    }

    pub fn is_point(&self) -> bool {
        self.lo().is_finite() && self.lo() == self.hi()
    }

    pub fn is_entire(&self) -> bool {
        !self.lo().is_finite() && self.lo_pos == self.hi_neg
    }

    pub fn is_bounded(&self) -> bool {
        self.lo().is_finite() && self.hi().is_finite()
    }

    pub fn contains(&self, d: f64) -> bool {
        self.lo() <= d && d <= self.hi()
    }

    pub fn is_subset(&self, other: &Interval) -> bool {
        self.lo() >= other.lo() && self.hi() <= other.hi()
    }

    /// Largest absolute value of any point.
    pub fn mag(&self) -> f64 {
        self.lo().abs().max(self.hi().abs())
    }

    /// Smallest absolute value of any point.
    pub fn mig(&self) -> f64 {
        if self.lo() >= 0.0 {
            self.lo()
        } else if self.hi() <= 0.0 {
            -self.hi()
        } else {
            0.0
        }
    }

    /// Encloses the exact midpoint. Requires a bounded interval.
    ///
    /// Each bound is halved before the sum so that bounds near `f64::MAX`
    /// cannot overflow. Negation happens before halving: a halved subnormal
    /// rounds down, which must never end up subtracted from a bound.
    pub fn mid_enc(&self) -> Interval {
        debug_assert_round_down();
        let v = self.opaque();
        Interval::rounded(
            v.lo_pos * 0.5 + (-v.hi_neg) * 0.5,
            v.hi_neg * 0.5 + (-v.lo_pos) * 0.5,
        )
    }

    /// Encloses the exact width.
    pub fn wid_enc(&self) -> Interval {
        debug_assert_round_down();
        let v = self.opaque();
        Interval::rounded(-v.hi_neg - v.lo_pos, v.hi_neg + v.lo_pos)
    }

    /// Encloses the exact radius. Requires a bounded interval.
    pub fn rad_enc(&self) -> Interval {
        debug_assert_round_down();
        let v = self.opaque();
        Interval::rounded(
            (-v.hi_neg - v.lo_pos) * 0.5,
            (v.hi_neg + v.lo_pos) * 0.5,
        )
    }

    /// A point of the interval close to its center.
    ///
    /// Half-bounded intervals answer `f64::MIN` or `f64::MAX`, the entire
    /// line answers 0.
    pub fn mid(&self) -> f64 {
        if self.is_empty() {
            f64::NAN
        } else if self.is_entire() {
            0.0
        } else if self.lo().is_infinite() {
            f64::MIN
        } else if self.hi().is_infinite() {
            f64::MAX
        } else {
            self.mid_enc().lo()
        }
    }

    /// Upper bound on the radius; infinite when unbounded.
    pub fn rad(&self) -> f64 {
        if self.is_empty() {
            f64::NAN
        } else if !self.is_bounded() {
            f64::INFINITY
        } else {
            self.rad_enc().hi()
        }
    }

    /// Upper bound on the width.
    pub fn wid(&self) -> f64 {
        if self.is_empty() {
            f64::NAN
        } else {
            self.wid_enc().hi()
        }
    }

    pub fn intersect(&self, other: &Interval) -> Result<Interval> {
        let lo_pos = self.lo_pos.max(other.lo_pos);
        let hi_neg = self.hi_neg.max(other.hi_neg);
        if lo_pos > -hi_neg {
            return Err(IntervalError::Disjoint {
                a: *self,
                b: *other,
            });
        }
        Ok(Interval::raw(lo_pos, hi_neg))
    }

    pub fn convex_hull(&self, other: &Interval) -> Interval {
        Interval::raw(self.lo_pos.min(other.lo_pos), self.hi_neg.min(other.hi_neg))
    }

    /// `{ max(x, d) | x in self }`
    pub fn max_scalar(&self, d: f64) -> Interval {
        Interval::raw(self.lo().max(d), -self.hi().max(d))
    }

    /// `{ min(x, d) | x in self }`
    pub fn min_scalar(&self, d: f64) -> Interval {
        Interval::raw(self.lo().min(d), -self.hi().min(d))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::ZERO
    }
}

impl From<f64> for Interval {
    fn from(d: f64) -> Self {
        Interval::point(d)
    }
}

impl From<i32> for Interval {
    fn from(v: i32) -> Self {
        Interval::point(f64::from(v))
    }
}

impl From<i64> for Interval {
    fn from(v: i64) -> Self {
        let m = v.unsigned_abs();
        match m.float_precision() {
            Some(prec) if prec <= f64::MANTISSA_DIGITS => Interval::point(v as f64),
            _ => {
                let shift = u64::BITS - m.leading_zeros() - f64::MANTISSA_DIGITS;
                let d = ((m >> shift) << shift) as f64;
                trace!("widening inexact conversion of {}", v);
                Interval::widened(if v < 0 { -d } else { d }, v.cmp(&0))
            }
        }
    }
}

impl From<&Integer> for Interval {
    fn from(v: &Integer) -> Self {
        Interval::from_exact(v)
    }
}

impl From<Integer> for Interval {
    fn from(v: Integer) -> Self {
        Interval::from_exact(&v)
    }
}

impl From<&Rational> for Interval {
    fn from(v: &Rational) -> Self {
        Interval::from_exact(v)
    }
}

impl From<Rational> for Interval {
    fn from(v: Rational) -> Self {
        Interval::from_exact(&v)
    }
}

fn write_bound(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    match f.precision() {
        Some(p) => write!(f, "{:.*}", p, x),
        None => write!(f, "{}", x),
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("[]");
        }
        if self.is_point() {
            f.write_str("[")?;
            write_bound(f, self.lo())?;
            return f.write_str("]");
        }
        if self.lo() == f64::NEG_INFINITY {
            f.write_str("(-infty")?;
        } else {
            f.write_str("[")?;
            write_bound(f, self.lo())?;
        }
        f.write_str(",")?;
        if self.hi() == f64::INFINITY {
            f.write_str("infty)")
        } else {
            write_bound(f, self.hi())?;
            f.write_str("]")
        }
    }
}
