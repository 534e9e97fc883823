//! Fixed-point monetary amount with 4 decimal places.
//!
//! Balances and hold amounts never touch floating point. Every value is a
//! `rust_decimal::Decimal` rescaled to [`Amount::SCALE`] after each operation.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// A monetary amount held at exactly 4 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use debit_ledger::Amount;
///
/// let reserved = Amount::from(100);
/// let actual = Amount::from_str("110.25").unwrap();
/// assert_eq!((reserved - actual).to_string(), "-10.2500");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Number of decimal places every amount carries.
    pub const SCALE: u32 = 4;

    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Wraps a `Decimal`, rounding it to [`Amount::SCALE`] places.
    pub fn new(value: Decimal) -> Self {
        let mut scaled = value;
        scaled.rescale(Self::SCALE);
        Amount(scaled)
    }

    /// Builds an amount from integer minor units (ten-thousandths).
    pub fn from_minor(minor: i64) -> Self {
        Amount(Decimal::new(minor, Self::SCALE))
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Strictly less than zero. Negative zero is not negative.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl From<i64> for Amount {
    fn from(units: i64) -> Self {
        Amount::new(Decimal::from(units))
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount::new)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
