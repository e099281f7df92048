//! Transaction entity - One immutable entry of the ledger.
//!
//! Each transaction has a calendar date (`fecha`), a kind (`tipo`: income or expense),
//! a category name (`categoria`, a soft reference into the category registry),
//! a non-negative amount (`monto`) and an optional free-text description.
//! The sign of a transaction's effect on the balance comes from `tipo` alone.

use crate::{errors::Error, money::Money};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of a ledger entry or category: money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    /// Income: adds `monto` to the balance
    #[sea_orm(string_value = "ingreso")]
    Ingreso,
    /// Expense: subtracts `monto` from the balance
    #[sea_orm(string_value = "gasto")]
    Gasto,
}

impl TxKind {
    /// Wire name of the kind (`"ingreso"` or `"gasto"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingreso => "ingreso",
            Self::Gasto => "gasto",
        }
    }
}

impl FromStr for TxKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ingreso" => Ok(Self::Ingreso),
            "gasto" => Ok(Self::Gasto),
            other => Err(Error::InvalidTransaction {
                reason: format!("tipo must be 'ingreso' or 'gasto', got '{other}'"),
            }),
        }
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique, monotonically increasing identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the ledger this entry belongs to
    pub user_id: i64,
    /// Calendar date of the movement (ISO-8601)
    pub fecha: Date,
    /// Income or expense
    pub tipo: TxKind,
    /// Category name; not a foreign key, survives category deletion
    pub categoria: String,
    /// Non-negative amount
    pub monto: Money,
    /// Optional free-text description
    pub descripcion: Option<String>,
    /// When the entry was appended
    pub created_at: DateTimeUtc,
}

/// Transactions reference categories by name only, so there are no relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_tx_kind_parsing() {
        assert_eq!("ingreso".parse::<TxKind>().unwrap(), TxKind::Ingreso);
        assert_eq!(" gasto ".parse::<TxKind>().unwrap(), TxKind::Gasto);
        assert!(matches!(
            "transfer".parse::<TxKind>(),
            Err(Error::InvalidTransaction { reason: _ })
        ));
    }

    #[test]
    fn test_tx_kind_serde_matches_wire_names() {
        assert_eq!(serde_json::to_string(&TxKind::Gasto).unwrap(), "\"gasto\"");
        let kind: TxKind = serde_json::from_str("\"ingreso\"").unwrap();
        assert_eq!(kind.as_str(), "ingreso");
    }
}
