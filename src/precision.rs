//! Significand-width queries, and the interface to exact numbers that
//! intervals can be built from.

use std::cmp::Ordering;

use rug::float::Round;
use rug::{Float, Integer, Rational};

/// Exponent of the largest finite power of two in binary64.
const MAX_EXP: i64 = f64::MAX_EXP as i64 - 1;
/// Exponent of the smallest positive subnormal binary64.
const MIN_EXP: i64 = f64::MIN_EXP as i64 - f64::MANTISSA_DIGITS as i64;

/// Number of significand bits a binary float needs to represent a value
/// exactly: the distance between its highest and lowest set bit, plus one.
///
/// Returns `Some(0)` for zero, and `None` when no binary64 can hold the
/// value whatever its significand width (non-dyadic rationals, magnitudes
/// outside the binary64 exponent range, non-finite floats).
pub trait FloatPrecision {
    fn float_precision(&self) -> Option<u32>;
}

/// An exact real number that intervals can be built from.
pub trait ExactReal: FloatPrecision {
    fn sign(&self) -> Ordering;

    /// Nearest binary64 in the direction of zero. Saturates at
    /// `±f64::MAX` and flushes to `±0.0`.
    fn to_f64_toward_zero(&self) -> f64;
}

impl FloatPrecision for u64 {
    fn float_precision(&self) -> Option<u32> {
        if *self == 0 {
            Some(0)
        } else {
            Some(u64::BITS - self.leading_zeros() - self.trailing_zeros())
        }
    }
}

impl FloatPrecision for i64 {
    fn float_precision(&self) -> Option<u32> {
        self.unsigned_abs().float_precision()
    }
}

impl FloatPrecision for i32 {
    fn float_precision(&self) -> Option<u32> {
        i64::from(*self).float_precision()
    }
}

impl FloatPrecision for f64 {
    fn float_precision(&self) -> Option<u32> {
        if !self.is_finite() {
            return None;
        }
        let bits = self.to_bits();
        let exp = (bits >> 52) & 0x7ff;
        let mut mant = bits & ((1 << 52) - 1);
        if exp != 0 {
            mant |= 1 << 52;
        }
        mant.float_precision()
    }
}

/// Precision of `m * 2^shift`, where `m` is a non-zero integer.
fn dyadic_precision(m: &Integer, shift: i64) -> Option<u32> {
    let abs = m.as_abs();
    let bits = abs.significant_bits();
    let tz = abs.find_one(0).unwrap_or(0);
    let lowest = i64::from(tz) + shift;
    let highest = i64::from(bits) - 1 + shift;
    if lowest < MIN_EXP || highest > MAX_EXP {
        return None;
    }
    Some(bits - tz)
}

impl FloatPrecision for Integer {
    fn float_precision(&self) -> Option<u32> {
        if self.cmp0() == Ordering::Equal {
            return Some(0);
        }
        dyadic_precision(self, 0)
    }
}

impl FloatPrecision for Rational {
    fn float_precision(&self) -> Option<u32> {
        if self.cmp0() == Ordering::Equal {
            return Some(0);
        }
        let den = self.denom();
        if !den.is_power_of_two() {
            return None;
        }
        let shift = -(i64::from(den.significant_bits()) - 1);
        dyadic_precision(self.numer(), shift)
    }
}

impl ExactReal for Integer {
    fn sign(&self) -> Ordering {
        self.cmp0()
    }

    fn to_f64_toward_zero(&self) -> f64 {
        let (f, _) = Float::with_val_round(f64::MANTISSA_DIGITS, self, Round::Zero);
        f.to_f64_round(Round::Zero)
    }
}

impl ExactReal for Rational {
    fn sign(&self) -> Ordering {
        self.cmp0()
    }

    fn to_f64_toward_zero(&self) -> f64 {
        let (f, _) = Float::with_val_round(f64::MANTISSA_DIGITS, self, Round::Zero);
        f.to_f64_round(Round::Zero)
    }
}
