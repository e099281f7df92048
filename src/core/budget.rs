//! Budget tracker - Monthly spending limits per expense category.
//!
//! Limits are upserted in batches; a batch is applied in a single database transaction
//! and rejected as a whole when any entry is invalid. Actual spend is never stored here:
//! usage is always read from the ledger for the requested month.

use crate::{
    core::{category, ledger, month::Month},
    entities::{CategoryBudget, TxKind, category_budget},
    errors::{Error, Result},
    money::Money,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One `{categoria, limite}` pair of a budget batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// Expense category name
    pub categoria: String,
    /// Monthly ceiling, between zero and [`Money::MAX`]
    pub limite: Money,
}

impl BudgetEntry {
    /// Creates a `{categoria, limite}` pair.
    #[must_use]
    pub fn new(categoria: &str, limite: Money) -> Self {
        Self {
            categoria: categoria.to_string(),
            limite,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.limite.is_negative() || self.limite.exceeds_max() {
            return Err(Error::InvalidAmount {
                amount: self.limite,
            });
        }
        if self.categoria.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: "Budget category cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl From<category_budget::Model> for BudgetEntry {
    fn from(model: category_budget::Model) -> Self {
        Self {
            categoria: model.categoria,
            limite: model.limite,
        }
    }
}

/// Spend against a category's limit for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetUsage {
    /// Category name
    pub categoria: String,
    /// Expenses booked under the category within the month
    pub spent: Money,
    /// Configured limit, zero when the category has no budget
    pub limite: Money,
    /// `spent / limite * 100`; `None` when `limite` is zero
    pub pct: Option<f64>,
}

impl BudgetUsage {
    /// Usage row with `pct` derived from `spent` and `limite`.
    #[must_use]
    pub fn new(categoria: impl Into<String>, spent: Money, limite: Money) -> Self {
        Self {
            categoria: categoria.into(),
            spent,
            limite,
            pct: spent.percent_of(limite),
        }
    }
}

/// Upserts every entry of the batch, all or nothing.
///
/// Referenced categories that do not exist yet are registered as expense categories.
/// A category registered as income cannot carry a budget and fails with
/// [`Error::Conflict`]. When the same category appears twice, the last entry wins.
pub async fn set_budgets(
    db: &DatabaseConnection,
    user_id: i64,
    entries: &[BudgetEntry],
) -> Result<Vec<category_budget::Model>> {
    for entry in entries {
        entry.validate()?;
    }

    let txn = db.begin().await?;
    let mut saved = Vec::with_capacity(entries.len());

    for entry in entries {
        let registered =
            category::ensure_category_exists(&txn, user_id, &entry.categoria, TxKind::Gasto).await?;
        if registered.tipo != TxKind::Gasto {
            return Err(Error::Conflict {
                message: format!(
                    "Category '{}' is an income category and cannot have a budget",
                    registered.nombre
                ),
            });
        }

        let model = match get_budget(&txn, user_id, &registered.nombre).await? {
            Some(existing) => {
                let mut active: category_budget::ActiveModel = existing.into();
                active.limite = Set(entry.limite);
                active.update(&txn).await?
            }
            None => {
                category_budget::ActiveModel {
                    user_id: Set(user_id),
                    categoria: Set(registered.nombre),
                    limite: Set(entry.limite),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };
        saved.push(model);
    }

    txn.commit().await?;

    info!(user_id, count = saved.len(), "category budgets saved");
    Ok(saved)
}

/// Lists the user's budgets ordered by category name.
pub async fn list_budgets<C>(db: &C, user_id: i64) -> Result<Vec<category_budget::Model>>
where
    C: ConnectionTrait,
{
    CategoryBudget::find()
        .filter(category_budget::Column::UserId.eq(user_id))
        .order_by_asc(category_budget::Column::Categoria)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The budget for one category, if set.
pub async fn get_budget<C>(
    db: &C,
    user_id: i64,
    categoria: &str,
) -> Result<Option<category_budget::Model>>
where
    C: ConnectionTrait,
{
    CategoryBudget::find()
        .filter(category_budget::Column::UserId.eq(user_id))
        .filter(category_budget::Column::Categoria.eq(categoria.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Spend against the category's limit within `month`.
pub async fn budget_usage<C>(
    db: &C,
    user_id: i64,
    categoria: &str,
    month: Month,
) -> Result<BudgetUsage>
where
    C: ConnectionTrait,
{
    let categoria = categoria.trim();
    let limite = get_budget(db, user_id, categoria)
        .await?
        .map_or_else(Money::zero, |b| b.limite);
    let spent = ledger::sum_by_category(
        db,
        user_id,
        categoria,
        Some(month.first_day()),
        Some(month.last_day()),
    )
    .await?;

    Ok(BudgetUsage::new(categoria, spent, limite))
}
