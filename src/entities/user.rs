//! User entity - An account that owns a ledger.
//!
//! Every business row (transactions, categories, envelopes, budgets) carries the
//! owning user's id, and every core operation is scoped to one user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 PHC string; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// `User` has no declared relationships; ownership is by `user_id` column
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
