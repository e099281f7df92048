//! Ledger store - The append-only log of income and expense transactions.
//!
//! This module is the single source of truth for balance and category spend. Entries are
//! appended, never updated or deleted, so every aggregate here is a plain fold over the
//! log. Appending validates the entry and registers its category in the same database
//! transaction, so a failed append leaves neither a ledger row nor a stray category.
//! All functions are async and scoped to one user's ledger.

use crate::{
    core::{category, month::Month},
    entities::{Transaction, TxKind, transaction},
    errors::{Error, Result},
    money::Money,
};
use sea_orm::{QueryOrder, Select, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::info;

/// A transaction waiting to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Calendar date of the movement
    pub fecha: Date,
    /// Income or expense
    pub tipo: TxKind,
    /// Category name, auto-registered when unknown
    pub categoria: String,
    /// Non-negative amount
    pub monto: Money,
    /// Optional description
    pub descripcion: Option<String>,
}

impl NewTransaction {
    /// Creates an entry without description.
    #[must_use]
    pub fn new(fecha: Date, tipo: TxKind, categoria: impl Into<String>, monto: Money) -> Self {
        Self {
            fecha,
            tipo,
            categoria: categoria.into(),
            monto,
            descripcion: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, descripcion: impl Into<String>) -> Self {
        self.descripcion = Some(descripcion.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.monto.is_negative() {
            return Err(Error::InvalidTransaction {
                reason: format!("monto must not be negative, got {}", self.monto),
            });
        }
        if self.monto.exceeds_max() {
            return Err(Error::InvalidTransaction {
                reason: format!("monto must not exceed {}, got {}", Money::MAX, self.monto),
            });
        }
        if self.categoria.trim().is_empty() {
            return Err(Error::InvalidTransaction {
                reason: "categoria cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Optional filters for listing and summing transactions. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionFilter {
    /// Earliest `fecha` to include
    pub from: Option<Date>,
    /// Latest `fecha` to include
    pub to: Option<Date>,
    /// Only this category
    pub categoria: Option<String>,
}

impl TransactionFilter {
    /// Every transaction dated within `month`.
    #[must_use]
    pub fn for_month(month: Month) -> Self {
        Self {
            from: Some(month.first_day()),
            to: Some(month.last_day()),
            categoria: None,
        }
    }

    fn apply(&self, query: Select<Transaction>) -> Select<Transaction> {
        let mut query = query;
        if let Some(from) = self.from {
            query = query.filter(transaction::Column::Fecha.gte(from));
        }
        if let Some(to) = self.to {
            query = query.filter(transaction::Column::Fecha.lte(to));
        }
        if let Some(categoria) = &self.categoria {
            query = query.filter(transaction::Column::Categoria.eq(categoria.trim()));
        }
        query
    }
}

/// Income and expense sums from one pass over the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Sum of `ingreso` amounts
    pub income: Money,
    /// Sum of `gasto` amounts
    pub expense: Money,
}

impl Totals {
    /// `income - expense`, exact.
    #[must_use]
    pub fn balance(&self) -> Money {
        self.income - self.expense
    }

    fn record(mut self, entry: &transaction::Model) -> Result<Self> {
        let (sum, context) = match entry.tipo {
            TxKind::Ingreso => (&mut self.income, "income total"),
            TxKind::Gasto => (&mut self.expense, "expense total"),
        };
        *sum = sum.checked_add(entry.monto).ok_or_else(|| overflow(context))?;
        Ok(self)
    }
}

/// Appends a transaction using the caller's connection or open database transaction.
///
/// Validates the amount and category, registers the category if it is new, and inserts
/// the entry. Callers that need atomicity with other writes pass their own
/// [`sea_orm::DatabaseTransaction`]; see [`record_transaction`] for the standalone form.
pub async fn append_transaction<C>(
    db: &C,
    user_id: i64,
    new: NewTransaction,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    new.validate()?;

    let registered = category::ensure_category_exists(db, user_id, &new.categoria, new.tipo).await?;

    let descripcion = new
        .descripcion
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let model = transaction::ActiveModel {
        user_id: Set(user_id),
        fecha: Set(new.fecha),
        tipo: Set(new.tipo),
        categoria: Set(registered.nombre),
        monto: Set(new.monto),
        descripcion: Set(descripcion),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Appends a transaction in its own database transaction.
pub async fn record_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    new: NewTransaction,
) -> Result<transaction::Model> {
    new.validate()?;

    let txn = db.begin().await?;
    let created = append_transaction(&txn, user_id, new).await?;
    txn.commit().await?;

    info!(
        user_id,
        id = created.id,
        tipo = created.tipo.as_str(),
        categoria = %created.categoria,
        monto = %created.monto,
        "transaction appended"
    );
    Ok(created)
}

/// Retrieves one of the user's transactions by id.
pub async fn get_transaction_by_id<C>(
    db: &C,
    user_id: i64,
    transaction_id: i64,
) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the user's transactions in insertion order, optionally filtered.
pub async fn list_transactions<C>(
    db: &C,
    user_id: i64,
    filter: &TransactionFilter,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    filter
        .apply(Transaction::find().filter(transaction::Column::UserId.eq(user_id)))
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Income and expense totals over the filtered transactions.
pub async fn sum_totals<C>(db: &C, user_id: i64, filter: &TransactionFilter) -> Result<Totals>
where
    C: ConnectionTrait,
{
    let entries = list_transactions(db, user_id, filter).await?;
    entries.iter().try_fold(Totals::default(), Totals::record)
}

/// `Σ ingreso − Σ gasto` over the whole ledger.
pub async fn sum_balance<C>(db: &C, user_id: i64) -> Result<Money>
where
    C: ConnectionTrait,
{
    Ok(sum_totals(db, user_id, &TransactionFilter::default())
        .await?
        .balance())
}

/// Sum of expense amounts booked under `categoria`, within optional inclusive date bounds.
pub async fn sum_by_category<C>(
    db: &C,
    user_id: i64,
    categoria: &str,
    from: Option<Date>,
    to: Option<Date>,
) -> Result<Money>
where
    C: ConnectionTrait,
{
    let filter = TransactionFilter {
        from,
        to,
        categoria: Some(categoria.to_string()),
    };
    let entries = filter
        .apply(
            Transaction::find()
                .filter(transaction::Column::UserId.eq(user_id))
                .filter(transaction::Column::Tipo.eq(TxKind::Gasto)),
        )
        .all(db)
        .await?;

    Money::checked_sum(entries.iter().map(|entry| entry.monto))
        .ok_or_else(|| overflow("category total"))
}

/// Expense sums per category over the filtered transactions, keyed by category name.
pub async fn expenses_by_category<C>(
    db: &C,
    user_id: i64,
    filter: &TransactionFilter,
) -> Result<BTreeMap<String, Money>>
where
    C: ConnectionTrait,
{
    let entries = list_transactions(db, user_id, filter).await?;
    let mut sums = BTreeMap::new();
    for entry in entries.into_iter().filter(|e| e.tipo == TxKind::Gasto) {
        let sum = sums.entry(entry.categoria).or_insert_with(Money::zero);
        *sum = sum
            .checked_add(entry.monto)
            .ok_or_else(|| overflow("category total"))?;
    }
    Ok(sums)
}

pub(crate) fn overflow(context: &str) -> Error {
    Error::AmountOverflow {
        context: context.to_string(),
    }
}
