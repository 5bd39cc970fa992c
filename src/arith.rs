//! Outward-rounded arithmetic.
//!
//! Every bound is computed as a downward-rounded quantity on the
//! `(lo, -hi)` representation, so a single [`RoundingMode::Downward`]
//! guard suffices for both bounds. Operands are read through an
//! optimization barrier so the compiler cannot fold an operation at build
//! time, where it would be rounded to nearest.
//!
//! [`RoundingMode::Downward`]: crate::RoundingMode::Downward

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use float_next_after::NextAfter;
use log::trace;

use crate::interval::Interval;
use crate::relation::Sign;
use crate::round::{debug_assert_round_down, opaque};

impl Interval {
    /// Negates in place.
    pub fn negate(&mut self) {
        std::mem::swap(&mut self.lo_pos, &mut self.hi_neg);
    }

    /// `{ x * x | x in self }`, tighter than `self * self` when the
    /// interval straddles zero.
    pub fn square(&self) -> Interval {
        debug_assert_round_down();
        let v = self.opaque();
        let (lp, hn) = (v.lo_pos, v.hi_neg);
        match v.sgn() {
            Sign::Pos => Interval::rounded(lp * lp, -hn * hn),
            Sign::Neg => Interval::rounded(hn * hn, -lp * lp),
            Sign::Zero => *self,
            Sign::OverZero => Interval::rounded(0.0, (-lp * lp).min(-hn * hn)),
        }
    }

    /// `self += a * b`
    // TODO: fuse the product into the bounds with f64::mul_add once the
    // four-way case split can be shared with Mul.
    pub fn fma(&mut self, a: &Interval, b: &Interval) {
        *self += *a * *b;
    }

    /// Hyperbolic tangent, widened by one ulp per side since the platform
    /// `tanh` is not correctly rounded.
    pub fn tanh(&self) -> Interval {
        let lo = self.lo().tanh().next_after(f64::NEG_INFINITY).max(-1.0);
        let hi = self.hi().tanh().next_after(f64::INFINITY).min(1.0);
        Interval::raw(lo, -hi)
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        Interval::raw(self.hi_neg, self.lo_pos)
    }
}

impl AddAssign for Interval {
    fn add_assign(&mut self, rhs: Interval) {
        debug_assert_round_down();
        let (a, b) = (self.opaque(), rhs.opaque());
        *self = Interval::rounded(a.lo_pos + b.lo_pos, a.hi_neg + b.hi_neg);
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(mut self, rhs: Interval) -> Interval {
        self += rhs;
        self
    }
}

impl SubAssign for Interval {
    fn sub_assign(&mut self, rhs: Interval) {
        *self += -rhs;
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(mut self, rhs: Interval) -> Interval {
        self -= rhs;
        self
    }
}

impl Add<f64> for Interval {
    type Output = Interval;

    fn add(self, rhs: f64) -> Interval {
        debug_assert_round_down();
        let (a, d) = (self.opaque(), opaque(rhs));
        Interval::rounded(a.lo_pos + d, a.hi_neg - d)
    }
}

impl Sub<f64> for Interval {
    type Output = Interval;

    fn sub(self, rhs: f64) -> Interval {
        debug_assert_round_down();
        let (a, d) = (self.opaque(), opaque(rhs));
        Interval::rounded(a.lo_pos - d, a.hi_neg + d)
    }
}

impl Mul<Interval> for f64 {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        debug_assert_round_down();
        let (d, b) = (opaque(self), rhs.opaque());
        if d == 0.0 {
            // 0 * inf is 0 for a real factor
            Interval::ZERO
        } else if d > 0.0 {
            Interval::rounded(d * b.lo_pos, d * b.hi_neg)
        } else {
            Interval::rounded(-d * b.hi_neg, -d * b.lo_pos)
        }
    }
}

impl Mul<f64> for Interval {
    type Output = Interval;

    fn mul(self, rhs: f64) -> Interval {
        rhs * self
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, b: Interval) -> Interval {
        debug_assert_round_down();
        let (a, b) = (self.opaque(), b.opaque());
        if a.sgn() == Sign::Zero || b.sgn() == Sign::Zero {
            // 0 * inf would be NaN; the product with the point zero is zero
            Interval::ZERO
        } else if a.lo() >= 0.0 && b.lo() >= 0.0 {
            // both non-negative
            Interval::rounded(a.lo_pos * b.lo_pos, -a.hi_neg * b.hi_neg)
        } else if a.hi() <= 0.0 && b.hi() <= 0.0 {
            // both non-positive
            Interval::rounded(a.hi_neg * b.hi_neg, -a.lo_pos * b.lo_pos)
        } else if a.hi() <= 0.0 && b.lo() >= 0.0 {
            Interval::rounded(a.lo_pos * -b.hi_neg, a.hi_neg * b.lo_pos)
        } else if a.lo() >= 0.0 && b.hi() <= 0.0 {
            Interval::rounded(-a.hi_neg * b.lo_pos, a.lo_pos * b.hi_neg)
        } else {
            // at least one contains zero; f64::min skips a NaN from 0 * inf
            Interval::rounded(
                (-a.hi_neg * b.lo_pos).min(a.lo_pos * -b.hi_neg),
                (-a.hi_neg * b.hi_neg).min(a.lo_pos * -b.lo_pos),
            )
        }
    }
}

impl MulAssign for Interval {
    fn mul_assign(&mut self, rhs: Interval) {
        *self = *self * rhs;
    }
}

impl MulAssign<f64> for Interval {
    fn mul_assign(&mut self, rhs: f64) {
        *self = rhs * *self;
    }
}

impl Div for Interval {
    type Output = Interval;

    /// Division by an interval containing zero is not defined over the
    /// reals; it yields the sentinel `(lo, -hi) = (-inf, -inf)`, which is
    /// [`Interval::ENTIRE`].
    fn div(self, b: Interval) -> Interval {
        debug_assert_round_down();
        let (a, b) = (self.opaque(), b.opaque());
        if b.lo_pos > 0.0 {
            if a.lo_pos > 0.0 {
                Interval::rounded(a.lo_pos / -b.hi_neg, a.hi_neg / b.lo_pos)
            } else if a.hi_neg > 0.0 {
                Interval::rounded(a.lo_pos / b.lo_pos, a.hi_neg / -b.hi_neg)
            } else {
                Interval::rounded(a.lo_pos / b.lo_pos, a.hi_neg / b.lo_pos)
            }
        } else if b.hi_neg > 0.0 {
            if a.lo_pos > 0.0 {
                Interval::rounded(a.hi_neg / b.hi_neg, -a.lo_pos / b.lo_pos)
            } else if a.hi_neg > 0.0 {
                Interval::rounded(-a.hi_neg / b.lo_pos, a.lo_pos / b.hi_neg)
            } else {
                Interval::rounded(a.hi_neg / b.hi_neg, a.lo_pos / b.hi_neg)
            }
        } else {
            trace!("{} / {}: denominator contains zero", a, b);
            Interval::raw(f64::NEG_INFINITY, f64::NEG_INFINITY)
        }
    }
}

impl DivAssign for Interval {
    fn div_assign(&mut self, rhs: Interval) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rug::Rational;
    use test_log::test;

    use super::*;
    use crate::round::RoundingGuard;

    fn ival(lo: f64, hi: f64) -> Interval {
        Interval::from_endpoints(lo, hi).unwrap()
    }

    fn exact(x: f64) -> Rational {
        Rational::from_f64(x).unwrap()
    }

    fn encloses(i: &Interval, q: &Rational) -> bool {
        (i.lo() == f64::NEG_INFINITY || exact(i.lo()) <= *q)
            && (i.hi() == f64::INFINITY || exact(i.hi()) >= *q)
    }

    fn random_bound<R: Rng>(rng: &mut R) -> f64 {
        let tiny = f64::from_bits(1);
        match rng.gen_range(0..8) {
            0 => 0.0,
            1 => f64::INFINITY,
            2 => f64::NEG_INFINITY,
            3 => rng.gen_range(-20i32..=20) as f64 * tiny,
            4 => rng.gen_range(-1.0..1.0) * f64::MAX,
            5 => rng.gen_range(-10.0..10.0) * 1e-300,
            // non-representable tenths so rounding actually happens
            _ => rng.gen_range(-40.0..40.0) / 10.0,
        }
    }

    fn random_interval<R: Rng>(rng: &mut R) -> Interval {
        let (a, b) = (random_bound(rng), random_bound(rng));
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        // an interval may be unbounded, but not sit at an infinity
        let lo = if lo == f64::INFINITY { f64::MAX } else { lo };
        let hi = if hi == f64::NEG_INFINITY { f64::MIN } else { hi };
        ival(lo, hi)
    }

    fn random_point<R: Rng>(rng: &mut R, i: &Interval) -> f64 {
        let (lo, hi) = (i.lo().max(f64::MIN), i.hi().min(f64::MAX));
        let t = rng.gen_range(0.0..=1.0);
        (lo * (1.0 - t) + hi * t).clamp(lo, hi)
    }

    #[test]
    fn test_point_arithmetic() {
        let _guard = RoundingGuard::downward().unwrap();
        assert_eq!(Interval::from(1) + Interval::from(2), Interval::from(3));
        assert_eq!(Interval::from(5) - Interval::from(7), Interval::from(-2));
        assert_eq!(Interval::from(3) * Interval::from(-4), Interval::from(-12));
        assert_eq!(Interval::from(3) / Interval::from(-4), Interval::point(-0.75));
        assert_eq!(Interval::from(3) + 0.5, Interval::point(3.5));
        assert_eq!(Interval::from(3) - 0.5, Interval::point(2.5));
    }

    #[test]
    fn test_mul_straddling() {
        let _guard = RoundingGuard::downward().unwrap();
        assert_eq!(ival(1.0, 2.0) * ival(-1.0, 1.0), ival(-2.0, 2.0));
        assert_eq!(ival(-1.0, 3.0) * ival(-2.0, 1.0), ival(-6.0, 3.0));
        assert_eq!(ival(-3.0, -1.0) * ival(2.0, 4.0), ival(-12.0, -2.0));
        assert_eq!(ival(-3.0, -1.0) * ival(-4.0, -2.0), ival(2.0, 12.0));
        assert_eq!(ival(1.0, 3.0) * ival(-4.0, -2.0), ival(-12.0, -2.0));
    }

    #[test]
    fn test_div_cases() {
        let _guard = RoundingGuard::downward().unwrap();
        assert_eq!(ival(1.0, 2.0) / ival(4.0, 8.0), ival(0.125, 0.5));
        assert_eq!(ival(-2.0, -1.0) / ival(4.0, 8.0), ival(-0.5, -0.125));
        assert_eq!(ival(-1.0, 2.0) / ival(4.0, 8.0), ival(-0.25, 0.5));
        assert_eq!(ival(1.0, 2.0) / ival(-8.0, -4.0), ival(-0.5, -0.125));
        assert_eq!(ival(-2.0, -1.0) / ival(-8.0, -4.0), ival(0.125, 0.5));
        assert_eq!(ival(-1.0, 2.0) / ival(-8.0, -4.0), ival(-0.5, 0.25));
    }

    #[test]
    fn test_div_by_zero_containing() {
        let _guard = RoundingGuard::downward().unwrap();
        let q = ival(1.0, 2.0) / ival(-1.0, 1.0);
        assert_eq!(q.lo_pos, f64::NEG_INFINITY);
        assert_eq!(q.hi_neg, f64::NEG_INFINITY);
        assert!(q.is_entire());
        assert!((ival(1.0, 2.0) / ival(0.0, 1.0)).is_entire());
        assert!((ival(1.0, 2.0) / Interval::ZERO).is_entire());
    }

    #[test]
    fn test_scalar_mul() {
        let _guard = RoundingGuard::downward().unwrap();
        assert_eq!(2.0 * ival(-1.0, 3.0), ival(-2.0, 6.0));
        assert_eq!(-2.0 * ival(-1.0, 3.0), ival(-6.0, 2.0));
        assert_eq!(ival(-1.0, 3.0) * 0.5, ival(-0.5, 1.5));
        let mut i = ival(1.0, 2.0);
        i *= -1.0;
        assert_eq!(i, ival(-2.0, -1.0));
    }

    #[test]
    fn test_mul_zero_by_unbounded() {
        let _guard = RoundingGuard::downward().unwrap();
        let up = ival(1.0, f64::INFINITY);
        let down = ival(f64::NEG_INFINITY, -1.0);
        assert_eq!(Interval::ZERO * up, Interval::ZERO);
        assert_eq!(up * Interval::ZERO, Interval::ZERO);
        assert_eq!(Interval::ZERO * Interval::ENTIRE, Interval::ZERO);
        assert_eq!(Interval::ENTIRE * Interval::ZERO, Interval::ZERO);
        assert_eq!(down * Interval::ZERO, Interval::ZERO);
        assert_eq!(0.0 * up, Interval::ZERO);
        assert_eq!(Interval::ENTIRE * 0.0, Interval::ZERO);

        let mut r = Interval::from(2);
        r.fma(&Interval::ZERO, &Interval::ENTIRE);
        assert_eq!(r, Interval::from(2));

        // a zero endpoint against an infinite one is not a zero factor
        for (a, b) in [
            (ival(0.0, 1.0), Interval::ENTIRE),
            (ival(-1.0, 0.0), up),
            (ival(0.0, 1.0), up),
            (ival(f64::NEG_INFINITY, 0.0), ival(0.0, f64::INFINITY)),
        ] {
            let p = a * b;
            assert!(!p.is_nai(), "{} * {} = {:?}", a, b, p);
            assert!(p.contains(0.0));
            assert!(!p.is_bounded(), "{} * {} = {}", a, b, p);
            assert_eq!(p, b * a);
        }
        assert_eq!(ival(0.0, 1.0) * up, ival(0.0, f64::INFINITY));
        assert!((ival(0.0, 1.0) * Interval::ENTIRE).is_entire());
    }

    #[test]
    fn test_negation() {
        let a = ival(-1.0, 3.0);
        assert_eq!(-a, ival(-3.0, 1.0));
        assert_eq!(-(-a), a);
        let mut b = a;
        b.negate();
        assert_eq!(b, -a);
        b.negate();
        assert_eq!(b, a);
    }

    #[test]
    fn test_square() {
        let _guard = RoundingGuard::downward().unwrap();
        assert_eq!(ival(2.0, 3.0).square(), ival(4.0, 9.0));
        assert_eq!(ival(-3.0, -2.0).square(), ival(4.0, 9.0));
        assert_eq!(ival(-2.0, 3.0).square(), ival(0.0, 9.0));
        assert_eq!(ival(-3.0, 2.0).square(), ival(0.0, 9.0));
        assert_eq!(Interval::ZERO.square(), Interval::ZERO);
        let x = ival(-2.0, 3.0);
        assert!(x.square().is_subset(&(x * x)));
        assert_ne!(x.square(), x * x);
    }

    #[test]
    fn test_fma() {
        let _guard = RoundingGuard::downward().unwrap();
        let mut r = Interval::from(1);
        r.fma(&ival(1.0, 2.0), &ival(3.0, 4.0));
        assert_eq!(r, ival(4.0, 9.0));
    }

    #[test]
    fn test_compound_assign() {
        let _guard = RoundingGuard::downward().unwrap();
        let mut r = ival(1.0, 2.0);
        r += ival(1.0, 1.0);
        assert_eq!(r, ival(2.0, 3.0));
        r -= ival(0.0, 1.0);
        assert_eq!(r, ival(1.0, 3.0));
        r *= ival(2.0, 2.0);
        assert_eq!(r, ival(2.0, 6.0));
        r /= ival(2.0, 2.0);
        assert_eq!(r, ival(1.0, 3.0));
    }

    #[test]
    fn test_tanh() {
        let t = ival(-1.0, 1.0).tanh();
        assert!(t.contains(1.0f64.tanh()));
        assert!(t.contains((-1.0f64).tanh()));
        assert_eq!(Interval::ENTIRE.tanh(), ival(-1.0, 1.0));
    }

    #[test]
    fn test_third_is_outward() {
        // constant operands, so nothing may be folded at build time
        let _guard = RoundingGuard::downward().unwrap();
        let third = Rational::from((1, 3));
        let q = Interval::from(1) / Interval::from(3);
        assert!(!q.is_point());
        assert!(encloses(&q, &third));
        let neg = Interval::from(-1) / Interval::from(3);
        assert!(!neg.is_point());
        assert!(encloses(&neg, &-third));

        let tenth = Rational::from((1, 10));
        let sum = Interval::point(0.1) + Interval::point(0.2);
        assert!(!sum.is_point());
        assert!(encloses(&sum, &(exact(0.1) + exact(0.2))));
        let scaled = Interval::from(1) * 0.1;
        assert!(scaled.is_point());
        assert!(!encloses(&Interval::point(0.1), &tenth));
        let tenths = Interval::from(1) / Interval::from(10);
        assert!(encloses(&tenths, &tenth));
        assert!(!tenths.is_point());
    }

    #[test]
    fn smaller_intervals_refine() {
        let _guard = RoundingGuard::downward().unwrap();
        let mut rng = rand::thread_rng();

        for _ in 0..10000 {
            let a = random_interval(&mut rng);
            let b = random_interval(&mut rng);
            let x = random_point(&mut rng, &a);
            let y = random_point(&mut rng, &b);
            let (qx, qy) = (exact(x), exact(y));

            let sum = Rational::from(&qx + &qy);
            let r = a + b;
            assert!(!r.is_nai(), "{} + {} = {:?}", a, b, r);
            assert!(encloses(&r, &sum), "{} + {} !~ {}", a, b, sum);

            let diff = Rational::from(&qx - &qy);
            let r = a - b;
            assert!(!r.is_nai(), "{} - {} = {:?}", a, b, r);
            assert!(encloses(&r, &diff), "{} - {} !~ {}", a, b, diff);

            let prod = Rational::from(&qx * &qy);
            let r = a * b;
            assert!(!r.is_nai(), "{} * {} = {:?}", a, b, r);
            assert!(encloses(&r, &prod), "{} * {} !~ {}", a, b, prod);

            let sq = Rational::from(&qx * &qx);
            let r = a.square();
            assert!(!r.is_nai(), "{}^2 = {:?}", a, r);
            assert!(encloses(&r, &sq), "{}^2 !~ {}", a, sq);

            if !b.contains(0.0) {
                let quot = Rational::from(&qx / &qy);
                let r = a / b;
                assert!(!r.is_nai(), "{} / {} = {:?}", a, b, r);
                assert!(encloses(&r, &quot), "{} / {} !~ {}", a, b, quot);
            }
        }
    }
}
