//! Envelope entity - A named savings sub-account ("sobre").
//!
//! Each envelope has a name, a display icon and the money currently held in it
//! (`saldo`). The balance is kept in lockstep with the ledger entries written by
//! deposits and withdrawals; it is never negative.

use crate::money::Money;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Envelope database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "envelopes")]
pub struct Model {
    /// Unique identifier for the envelope
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the envelope
    pub user_id: i64,
    /// Human-readable name (e.g., "Vacaciones"), unique per user
    pub nombre: String,
    /// Display glyph, no behavioral effect
    pub icono: String,
    /// Money currently held in the envelope
    pub saldo: Money,
    /// When the envelope was created
    pub created_at: DateTimeUtc,
}

/// Envelope transfers are booked under a policy category, not linked rows.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
