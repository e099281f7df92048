//! Money type for ledger amounts.
//!
//! Amounts are held as integer minor units (cents) so that balance, income and
//! expense always add up exactly. On the wire they are plain JSON numbers in
//! major units (`250000`, `12.5`); in the database they are stored as BIGINT.

use sea_orm::DeriveValueType;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::ops::{Neg, Sub};

/// Minor units per major currency unit.
const MINOR_PER_MAJOR: i64 = 100;

/// A monetary amount stored as cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveValueType)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted for a single entry or limit (ten trillion major units).
    ///
    /// Every amount up to this bound survives the trip through an `f64` exactly.
    pub const MAX: Self = Self(1_000_000_000_000_000);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole major units.
    #[must_use]
    pub const fn from_major(units: i64) -> Self {
        Self(units * MINOR_PER_MAJOR)
    }

    /// Converts a floating-point major-unit amount, rounding to the nearest cent.
    ///
    /// Returns `None` for NaN, infinities and values beyond `±`[`Money::MAX`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_major_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * MINOR_PER_MAJOR as f64).round();
        let max = Self::MAX.0 as f64;
        if cents > max || cents < -max {
            return None;
        }
        Some(Self(cents as i64))
    }

    /// The zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Amount in minor units.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Amount in major units as a float, for presentation only.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_major_f64(self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// True for exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// True for amounts above zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// True for amounts below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// True when the amount's magnitude is above [`Money::MAX`].
    #[must_use]
    pub const fn exceeds_max(self) -> bool {
        self.0 > Self::MAX.0 || self.0 < -Self::MAX.0
    }

    /// Sum of two amounts, or `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Sum of all amounts, or `None` as soon as the running total overflows.
    pub fn checked_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), Self::checked_add)
    }

    /// This amount as a percentage of `whole`, or `None` when `whole` is zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_of(self, whole: Self) -> Option<f64> {
        if whole.is_zero() {
            return None;
        }
        Some(self.0 as f64 / whole.0 as f64 * 100.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per, abs % per)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINOR_PER_MAJOR == 0 {
            serializer.serialize_i64(self.0 / MINOR_PER_MAJOR)
        } else {
            serializer.serialize_f64(self.as_major_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_major_f64(value)
            .ok_or_else(|| de::Error::custom(format!("amount out of range: {value}")))
    }
}
