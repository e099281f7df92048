//! Stats aggregation - Read-only views over the ledger and budgets.
//!
//! Nothing here mutates state. The balance snapshot is computed from a single fold over
//! the ledger, so `balance == income - expense` holds exactly. The monthly budget report
//! combines configured limits with the month's expenses per category and returns
//! structured data for the HTTP layer to serialize.

use crate::{
    core::{
        budget::{self, BudgetUsage},
        ledger::{self, TransactionFilter},
        month::Month,
    },
    errors::Result,
    money::Money,
};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use std::collections::BTreeMap;

/// Overall balance, income and expense of a user's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// `income - expense`
    pub balance: Money,
    /// Sum of all `ingreso` amounts
    pub income: Money,
    /// Sum of all `gasto` amounts
    pub expense: Money,
}

/// Budget usage of every relevant category for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBudgetReport {
    /// Month covered, `YYYY-MM`
    pub month: String,
    /// One row per category with a budget or with spending in the month
    pub categories: Vec<BudgetUsage>,
    /// Sum of all limits in `categories`
    pub total_budget: Money,
    /// Sum of all spending in `categories`
    pub total_spent: Money,
    /// `total_spent / total_budget * 100`; `None` without any budget
    pub pct: Option<f64>,
}

/// Computes the balance snapshot from the whole ledger.
pub async fn snapshot<C>(db: &C, user_id: i64) -> Result<Snapshot>
where
    C: ConnectionTrait,
{
    let totals = ledger::sum_totals(db, user_id, &TransactionFilter::default()).await?;
    Ok(Snapshot {
        balance: totals.balance(),
        income: totals.income,
        expense: totals.expense,
    })
}

/// Builds the budget report for `month`.
///
/// Categories named in `excluded` are left out even when money was booked under them;
/// callers pass the envelope transfer category so savings deposits do not show up as
/// ordinary spending.
pub async fn monthly_budget_report<C>(
    db: &C,
    user_id: i64,
    month: Month,
    excluded: &[&str],
) -> Result<MonthlyBudgetReport>
where
    C: ConnectionTrait,
{
    let limits: BTreeMap<String, Money> = budget::list_budgets(db, user_id)
        .await?
        .into_iter()
        .map(|b| (b.categoria, b.limite))
        .collect();
    let spending =
        ledger::expenses_by_category(db, user_id, &TransactionFilter::for_month(month)).await?;

    let mut names: Vec<&String> = limits.keys().chain(spending.keys()).collect();
    names.sort();
    names.dedup();

    let categories: Vec<BudgetUsage> = names
        .into_iter()
        .filter(|name| !excluded.contains(&name.as_str()))
        .map(|name| {
            BudgetUsage::new(
                name.as_str(),
                spending.get(name).copied().unwrap_or_default(),
                limits.get(name).copied().unwrap_or_default(),
            )
        })
        .collect();

    let total_budget = Money::checked_sum(categories.iter().map(|c| c.limite))
        .ok_or_else(|| ledger::overflow("budget total"))?;
    let total_spent = Money::checked_sum(categories.iter().map(|c| c.spent))
        .ok_or_else(|| ledger::overflow("spending total"))?;

    Ok(MonthlyBudgetReport {
        month: month.to_string(),
        pct: total_spent.percent_of(total_budget),
        categories,
        total_budget,
        total_spent,
    })
}
