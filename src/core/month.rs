//! Calendar month helper for budget periods.
//!
//! A budget limit applies per calendar month. `Month` parses and prints the
//! `YYYY-MM` form used by the API and yields the inclusive first/last day
//! range that ledger queries filter on.

use crate::errors::{Error, Result};
use chrono::{Datelike, Local, Months, NaiveDate};
use std::{fmt, str::FromStr};

/// A calendar month, represented by its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// The month with the given year and month number (1-12).
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| Error::InvalidInput {
                message: format!("invalid month: {year}-{month:02}"),
            })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// The current month in local time.
    #[must_use]
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Last day of the month (28th-31st).
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput {
            message: format!("month must look like YYYY-MM, got '{s}'"),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let month: Month = "2026-02".parse().unwrap();
        assert_eq!(month.to_string(), "2026-02");
        assert_eq!(month.first_day(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["2026", "2026-13", "2026-00", "26-01", "2026-1", "abcd-ef", ""] {
            assert!(
                matches!(bad.parse::<Month>(), Err(Error::InvalidInput { message: _ })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_last_day_handles_month_lengths() {
        let feb_leap: Month = "2024-02".parse().unwrap();
        assert_eq!(feb_leap.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec: Month = "2025-12".parse().unwrap();
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_containing() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let month = Month::containing(date);
        assert_eq!(month.to_string(), "2026-10");
        assert!(month.first_day() <= date && date <= month.last_day());
    }
}
