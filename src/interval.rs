//! Closed real intervals and the arithmetic used to build enclosures.
//!
//! An [`Interval`] `[lo, hi]` stands for an unknown real value known to lie
//! between its endpoints. Every operation returns an interval containing all
//! results of the corresponding real operation applied to members of its
//! operands, so composing them yields an enclosure of a function's range over
//! a box.
//!
//! Arithmetic is carried out in plain `f64` without directed rounding.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A closed interval `[lo, hi]` with `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    /// Create the interval `[lo, hi]`.
    #[inline]
    pub fn new(lo: f64, hi: f64) -> Self {
        debug_assert!(lo <= hi, "lo ({}) > hi ({})", lo, hi);
        Self { lo, hi }
    }

    /// Create the degenerate interval `[v, v]`.
    #[inline]
    pub fn point(v: f64) -> Self {
        Self { lo: v, hi: v }
    }

    /// Left endpoint.
    #[inline]
    pub fn left(&self) -> f64 {
        self.lo
    }

    /// Right endpoint.
    #[inline]
    pub fn right(&self) -> f64 {
        self.hi
    }

    /// Midpoint `(lo + hi) / 2`, computed without overflowing near `f64::MAX`.
    #[inline]
    pub fn mid(&self) -> f64 {
        0.5 * self.lo + 0.5 * self.hi
    }

    /// True if the midpoint lies strictly inside, so both halves of a
    /// bisection are narrower than `self`. False once the interval is a
    /// single ulp wide.
    #[inline]
    pub fn can_bisect(&self) -> bool {
        let m = self.mid();
        self.lo < m && m < self.hi
    }

    /// Width `hi - lo`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }

    /// True if `other` lies entirely inside `self`.
    #[inline]
    pub fn encloses(&self, other: &Interval) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.lo == self.hi
    }

    /// Smallest interval containing both operands.
    #[inline]
    pub fn hull(self, other: Self) -> Self {
        Self {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }

    /// Range of `v * v` for `v` in the interval.
    ///
    /// Tighter than `self * self`, which loses the dependency between the two
    /// factors when the interval straddles zero.
    #[inline]
    pub fn sqr(self) -> Self {
        if self.lo >= 0.0 {
            Self::new(self.lo * self.lo, self.hi * self.hi)
        } else if self.hi <= 0.0 {
            Self::new(self.hi * self.hi, self.lo * self.lo)
        } else {
            Self::new(0.0, (self.lo * self.lo).max(self.hi * self.hi))
        }
    }

    /// Range of `v^n` for `v` in the interval.
    pub fn powi(self, n: u32) -> Self {
        match n {
            0 => Self::point(1.0),
            1 => self,
            _ if n % 2 == 1 => Self::new(self.lo.powi(n as i32), self.hi.powi(n as i32)),
            _ => {
                // Even power: monotone in |v|.
                let sq = self.sqr();
                let half = n / 2;
                Self::new(sq.lo.powi(half as i32), sq.hi.powi(half as i32))
            }
        }
    }

    /// Range of `|v|` for `v` in the interval.
    #[inline]
    pub fn abs(self) -> Self {
        if self.lo >= 0.0 {
            self
        } else if self.hi <= 0.0 {
            -self
        } else {
            Self::new(0.0, self.hi.max(-self.lo))
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.15e}, {:.15e}]", self.lo, self.hi)
    }
}

impl From<f64> for Interval {
    fn from(v: f64) -> Self {
        Self::point(v)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Interval ⊕ Interval
// ──────────────────────────────────────────────────────────────────────────────

impl Add for Interval {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.lo + rhs.lo, self.hi + rhs.hi)
    }
}

impl Sub for Interval {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.lo - rhs.hi, self.hi - rhs.lo)
    }
}

impl Mul for Interval {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = self.lo * rhs.lo;
        let b = self.lo * rhs.hi;
        let c = self.hi * rhs.lo;
        let d = self.hi * rhs.hi;
        Self::new(a.min(b).min(c).min(d), a.max(b).max(c).max(d))
    }
}

impl Neg for Interval {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.hi, -self.lo)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Mixed scalar arithmetic
// ──────────────────────────────────────────────────────────────────────────────

impl Add<f64> for Interval {
    type Output = Self;
    #[inline]
    fn add(self, rhs: f64) -> Self {
        Self::new(self.lo + rhs, self.hi + rhs)
    }
}

impl Sub<f64> for Interval {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: f64) -> Self {
        Self::new(self.lo - rhs, self.hi - rhs)
    }
}

impl Mul<f64> for Interval {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        if rhs >= 0.0 {
            Self::new(self.lo * rhs, self.hi * rhs)
        } else {
            Self::new(self.hi * rhs, self.lo * rhs)
        }
    }
}

impl Add<Interval> for f64 {
    type Output = Interval;
    #[inline]
    fn add(self, rhs: Interval) -> Interval {
        rhs + self
    }
}

impl Sub<Interval> for f64 {
    type Output = Interval;
    #[inline]
    fn sub(self, rhs: Interval) -> Interval {
        Interval::new(self - rhs.hi, self - rhs.lo)
    }
}

impl Mul<Interval> for f64 {
    type Output = Interval;
    #[inline]
    fn mul(self, rhs: Interval) -> Interval {
        rhs * self
    }
}
