//! Category entity - A named classification for ledger entries.
//!
//! Categories are keyed by name per user and carry a kind (income or expense).
//! Transactions hold the category name as a plain string, so deleting a
//! category never touches the ledger.

use super::transaction::TxKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the category
    pub user_id: i64,
    /// Category name, unique per user
    pub nombre: String,
    /// Whether the category classifies income or expenses
    pub tipo: TxKind,
}

/// `Category` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
