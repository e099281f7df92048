//! Envelope business logic - Savings envelopes ("sobres") and their transfers.
//!
//! An envelope holds money set aside from the general balance. Every deposit or
//! withdrawal changes the envelope's `saldo` and appends the matching ledger entry in a
//! single database transaction, so the two never drift apart. Which ledger category those
//! entries use is decided by [`TransferPolicy`]; by default both directions are booked
//! under [`DEFAULT_TRANSFER_CATEGORY`], not under the envelope's own name.

use crate::{
    core::ledger::{self, NewTransaction},
    entities::{Envelope, TxKind, envelope},
    errors::{Error, Result},
    money::Money,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Deserialize;
use tracing::info;

/// Ledger category used for envelope transfers unless configured otherwise.
pub const DEFAULT_TRANSFER_CATEGORY: &str = "Ahorro";

/// Icon given to envelopes created without one.
pub const DEFAULT_ENVELOPE_ICON: &str = "💰";

/// How envelope transfers are booked in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransferPolicy {
    /// Category of the `gasto` entry written by a deposit
    pub deposit_category: String,
    /// Category of the `ingreso` entry written by a withdrawal
    pub withdraw_category: String,
    /// Reject deposits larger than the current general balance
    pub require_available_balance: bool,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            deposit_category: DEFAULT_TRANSFER_CATEGORY.to_string(),
            withdraw_category: DEFAULT_TRANSFER_CATEGORY.to_string(),
            require_available_balance: false,
        }
    }
}

/// Retrieves all of a user's envelopes, ordered alphabetically by name.
pub async fn get_all_envelopes<C>(db: &C, user_id: i64) -> Result<Vec<envelope::Model>>
where
    C: ConnectionTrait,
{
    Envelope::find()
        .filter(envelope::Column::UserId.eq(user_id))
        .order_by_asc(envelope::Column::Nombre)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the user's envelopes by its unique ID.
pub async fn get_envelope_by_id<C>(
    db: &C,
    user_id: i64,
    envelope_id: i64,
) -> Result<Option<envelope::Model>>
where
    C: ConnectionTrait,
{
    Envelope::find_by_id(envelope_id)
        .filter(envelope::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the user's envelopes by name. Names are unique per user.
pub async fn get_envelope_by_name<C>(
    db: &C,
    user_id: i64,
    nombre: &str,
) -> Result<Option<envelope::Model>>
where
    C: ConnectionTrait,
{
    Envelope::find()
        .filter(envelope::Column::UserId.eq(user_id))
        .filter(envelope::Column::Nombre.eq(nombre.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new envelope with zero balance.
///
/// The name is trimmed and must be non-empty and not already used by another of the
/// user's envelopes.
pub async fn create_envelope<C>(
    db: &C,
    user_id: i64,
    nombre: &str,
    icono: Option<&str>,
) -> Result<envelope::Model>
where
    C: ConnectionTrait,
{
    let nombre = nombre.trim();
    if nombre.is_empty() {
        return Err(Error::InvalidInput {
            message: "Envelope name cannot be empty".to_string(),
        });
    }

    if get_envelope_by_name(db, user_id, nombre).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("An envelope named '{nombre}' already exists"),
        });
    }

    let icono = icono
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .unwrap_or(DEFAULT_ENVELOPE_ICON);

    let model = envelope::ActiveModel {
        user_id: Set(user_id),
        nombre: Set(nombre.to_string()),
        icono: Set(icono.to_string()),
        saldo: Set(Money::zero()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(user_id, id = created.id, nombre = %created.nombre, "envelope created");
    Ok(created)
}

/// Adds `amount_delta` to an envelope's balance with a single SQL UPDATE.
///
/// For negative deltas the update only applies while the balance covers the amount
/// (`WHERE saldo >= -delta`), so concurrent withdrawals can never overdraw. Positive
/// deltas only apply while the result still fits in an `i64`.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `envelope_id` - ID of the envelope to update
/// * `amount_delta` - Amount to add to the balance (negative for subtraction)
///
/// # Returns
/// The updated envelope model
pub async fn update_envelope_balance_atomic<C>(
    db: &C,
    envelope_id: i64,
    amount_delta: Money,
) -> Result<envelope::Model>
where
    C: ConnectionTrait,
{
    let mut update = Envelope::update_many()
        .col_expr(
            envelope::Column::Saldo,
            Expr::col(envelope::Column::Saldo).add(amount_delta.cents()),
        )
        .filter(envelope::Column::Id.eq(envelope_id));
    if amount_delta.is_negative() {
        update = update.filter(envelope::Column::Saldo.gte(-amount_delta));
    } else {
        update = update.filter(
            envelope::Column::Saldo.lte(Money::from_cents(i64::MAX - amount_delta.cents())),
        );
    }
    let result = update.exec(db).await?;

    let updated = Envelope::find_by_id(envelope_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::EnvelopeNotFound {
            name: envelope_id.to_string(),
        })?;

    if result.rows_affected == 0 {
        if !amount_delta.is_negative() {
            return Err(ledger::overflow("envelope balance"));
        }
        return Err(Error::InsufficientFunds {
            current: updated.saldo,
            required: -amount_delta,
        });
    }
    Ok(updated)
}

fn require_positive(monto: Money) -> Result<()> {
    if monto.is_positive() && !monto.exceeds_max() {
        Ok(())
    } else {
        Err(Error::InvalidAmount { amount: monto })
    }
}

/// Moves `monto` from the general balance into an envelope.
///
/// Increments `saldo` and appends a `gasto` entry under the policy's deposit category,
/// both in one database transaction.
pub async fn deposit(
    db: &DatabaseConnection,
    user_id: i64,
    envelope_id: i64,
    monto: Money,
    policy: &TransferPolicy,
) -> Result<envelope::Model> {
    require_positive(monto)?;

    let txn = db.begin().await?;

    let target = get_envelope_by_id(&txn, user_id, envelope_id)
        .await?
        .ok_or_else(|| Error::EnvelopeNotFound {
            name: envelope_id.to_string(),
        })?;

    if policy.require_available_balance {
        let available = ledger::sum_balance(&txn, user_id).await?;
        if available < monto {
            return Err(Error::InsufficientFunds {
                current: available,
                required: monto,
            });
        }
    }

    ledger::append_transaction(
        &txn,
        user_id,
        NewTransaction::new(
            chrono::Local::now().date_naive(),
            TxKind::Gasto,
            policy.deposit_category.as_str(),
            monto,
        )
        .with_description(format!("Depósito a sobre: {}", target.nombre)),
    )
    .await?;

    let updated = update_envelope_balance_atomic(&txn, target.id, monto).await?;

    txn.commit().await?;

    info!(user_id, id = updated.id, monto = %monto, saldo = %updated.saldo, "envelope deposit");
    Ok(updated)
}

/// Moves `monto` from an envelope back into the general balance.
///
/// Fails with [`Error::InsufficientFunds`] when the envelope holds less than `monto`.
/// Decrements `saldo` and appends an `ingreso` entry under the policy's withdraw
/// category, both in one database transaction.
pub async fn withdraw(
    db: &DatabaseConnection,
    user_id: i64,
    envelope_id: i64,
    monto: Money,
    policy: &TransferPolicy,
) -> Result<envelope::Model> {
    require_positive(monto)?;

    let txn = db.begin().await?;

    let source = get_envelope_by_id(&txn, user_id, envelope_id)
        .await?
        .ok_or_else(|| Error::EnvelopeNotFound {
            name: envelope_id.to_string(),
        })?;

    if source.saldo < monto {
        return Err(Error::InsufficientFunds {
            current: source.saldo,
            required: monto,
        });
    }

    let updated = update_envelope_balance_atomic(&txn, source.id, -monto).await?;

    ledger::append_transaction(
        &txn,
        user_id,
        NewTransaction::new(
            chrono::Local::now().date_naive(),
            TxKind::Ingreso,
            policy.withdraw_category.as_str(),
            monto,
        )
        .with_description(format!("Retiro de sobre: {}", source.nombre)),
    )
    .await?;

    txn.commit().await?;

    info!(user_id, id = updated.id, monto = %monto, saldo = %updated.saldo, "envelope withdrawal");
    Ok(updated)
}

/// Deletes an empty envelope.
///
/// An envelope that still holds money is rejected with [`Error::Conflict`]; the caller
/// must withdraw the balance first.
pub async fn delete_envelope<C>(db: &C, user_id: i64, envelope_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = get_envelope_by_id(db, user_id, envelope_id)
        .await?
        .ok_or_else(|| Error::EnvelopeNotFound {
            name: envelope_id.to_string(),
        })?;

    if !existing.saldo.is_zero() {
        return Err(Error::Conflict {
            message: format!(
                "Envelope '{}' still holds {}; withdraw it before deleting",
                existing.nombre, existing.saldo
            ),
        });
    }

    existing.delete(db).await?;
    info!(user_id, id = envelope_id, "envelope deleted");
    Ok(())
}
