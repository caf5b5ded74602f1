use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::num::ParseFloatError;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use num_traits::{Bounded, SaturatingAdd, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed-point decimal with three places, used for hours, kilograms and edge
/// weights alike. Totally ordered, so it can key a binary heap and ties are
/// exact.
#[derive(Default, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Num {
    v: i64,
}

impl Num {
    pub const PRECISION: usize = 3;
    const PREC_POW_10: i64 = 1_000;
    pub const EPSILON: Self = Self { v: 1 };
    pub const MAX: Self = Self { v: i64::MAX };
    pub const MIN: Self = Self { v: i64::MIN };
    pub const ZERO: Self = Self { v: 0 };
    pub const ONE: Self = Self {
        v: Self::PREC_POW_10,
    };

    pub const fn from_i64(o: i64) -> Self {
        Self {
            v: o * Self::PREC_POW_10,
        }
    }

    pub const fn value(&self) -> i64 {
        self.v
    }

    pub fn is_infinite(&self) -> bool {
        *self == Self::MAX
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self {
            v: self.v.saturating_add(rhs.v),
        }
    }
}

/// Lossy: NaN maps to zero and out-of-range values clamp. Input text goes
/// through [`FromStr`], which rejects both.
impl From<f64> for Num {
    fn from(o: f64) -> Self {
        if o.is_infinite() && o.is_sign_positive() {
            return Self::MAX;
        }
        Self {
            v: (o * Self::PREC_POW_10 as f64).round() as i64,
        }
    }
}

impl From<f32> for Num {
    fn from(o: f32) -> Self {
        Self::from(o as f64)
    }
}

impl From<i32> for Num {
    fn from(o: i32) -> Self {
        Self::from_i64(o as i64)
    }
}

impl From<u32> for Num {
    fn from(o: u32) -> Self {
        Self::from_i64(o as i64)
    }
}

impl From<i64> for Num {
    fn from(o: i64) -> Self {
        Self::from_i64(o)
    }
}

impl From<Num> for f64 {
    fn from(o: Num) -> Self {
        if o.is_infinite() {
            return f64::INFINITY;
        }
        o.v as f64 / Num::PREC_POW_10 as f64
    }
}

impl Add for Num {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { v: self.v + rhs.v }
    }
}

impl AddAssign for Num {
    fn add_assign(&mut self, rhs: Self) {
        self.v += rhs.v
    }
}

impl Sub for Num {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { v: self.v - rhs.v }
    }
}

impl SubAssign for Num {
    fn sub_assign(&mut self, rhs: Self) {
        self.v -= rhs.v
    }
}

impl Sum for Num {
    fn sum<I: Iterator<Item = Num>>(iter: I) -> Num {
        Num {
            v: iter.fold(0, |sum, rhs| sum + rhs.v),
        }
    }
}

impl Zero for Num {
    fn zero() -> Self {
        Self::ZERO
    }
    fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Bounded for Num {
    fn min_value() -> Self {
        Self::MIN
    }
    fn max_value() -> Self {
        Self::MAX
    }
}

impl SaturatingAdd for Num {
    fn saturating_add(&self, v: &Self) -> Self {
        Self {
            v: self.v.saturating_add(v.v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNumError {
    #[error(transparent)]
    Float(#[from] ParseFloatError),
    #[error("{0} is not a finite number")]
    NonFinite(String),
    #[error("{0} is out of range")]
    OutOfRange(String),
}

impl FromStr for Num {
    type Err = ParseNumError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let v = s.parse::<f64>()?;
        if !v.is_finite() {
            return Err(ParseNumError::NonFinite(s.to_string()));
        }
        // i64::MAX itself is reserved for infinity
        if (v * Self::PREC_POW_10 as f64).round().abs() >= i64::MAX as f64 {
            return Err(ParseNumError::OutOfRange(s.to_string()));
        }
        Ok(v.into())
    }
}

impl Display for Num {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_infinite() {
            return write!(f, "inf");
        }
        // trailing zeros are noise in reports: 12.500 -> 12.5, 12.000 -> 12
        let s = format!("{:.*}", Self::PRECISION, f64::from(*self));
        write!(f, "{}", s.trim_end_matches('0').trim_end_matches('.'))
    }
}

impl Debug for Num {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
