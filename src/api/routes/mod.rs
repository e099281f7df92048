/// Login, logout and the current user
pub mod auth;
/// Category budgets and monthly usage
pub mod budgets;
/// Category registry
pub mod categories;
/// Savings envelopes
pub mod savings;
/// Balance snapshot
pub mod stats;
/// Ledger transactions
pub mod transactions;

use crate::{core::month::Month, errors::Result};
use serde::Deserialize;

/// `?month=YYYY-MM`, defaulting to the current month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// Requested month, blank or absent for the current one
    pub month: Option<String>,
}

impl MonthQuery {
    /// The requested month, or the current one.
    pub fn resolve(&self) -> Result<Month> {
        self.month
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .map_or_else(|| Ok(Month::current()), str::parse)
    }
}
