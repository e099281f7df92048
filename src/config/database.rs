//! Database configuration module for the ledger service.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Per-user uniqueness of category, envelope
//! and budget names is enforced with composite unique indexes created alongside.

use crate::entities::{
    Category, CategoryBudget, Envelope, Transaction, User, category, category_budget, envelope,
    transaction,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityName, Schema,
    sea_query::{Index, IndexCreateStatement, IntoIden},
};
use std::path::Path;
use tracing::{debug, info};

/// Database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/envelope_ledger.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// File path behind a `SQLite` URL, or `None` for in-memory and non-`SQLite` URLs.
fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Some(Path::new(path))
}

/// Establishes a connection to the database at `database_url`.
///
/// For a file-backed `SQLite` database the parent directory is created first.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url)
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }

    debug!(database_url, "connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

fn unique_index<E, C>(name: &str, entity: E, columns: &[C]) -> IndexCreateStatement
where
    E: EntityName,
    C: IntoIden + Copy,
{
    let mut index = Index::create();
    index
        .name(name)
        .table(entity.table_ref())
        .unique()
        .if_not_exists();
    for column in columns {
        index.col(*column);
    }
    index
}

/// Creates all tables and indexes if they do not exist yet.
///
/// Safe to call on every start.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Transaction),
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Envelope),
        schema.create_table_from_entity(CategoryBudget),
    ];
    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    let indexes = [
        unique_index(
            "idx_categories_user_nombre",
            Category,
            &[category::Column::UserId, category::Column::Nombre],
        ),
        unique_index(
            "idx_envelopes_user_nombre",
            Envelope,
            &[envelope::Column::UserId, envelope::Column::Nombre],
        ),
        unique_index(
            "idx_category_budgets_user_categoria",
            CategoryBudget,
            &[category_budget::Column::UserId, category_budget::Column::Categoria],
        ),
        Index::create()
            .name("idx_transactions_user_fecha")
            .table(Transaction.table_ref())
            .col(transaction::Column::UserId)
            .col(transaction::Column::Fecha)
            .if_not_exists()
            .to_owned(),
    ];
    for index in &indexes {
        db.execute(builder.build(index)).await?;
    }

    info!("database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        entities::{CategoryModel, EnvelopeModel, TransactionModel, UserModel},
        errors::Error,
    };
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, EntityTrait, QuerySelect, Set};

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite://data/ledger.sqlite?mode=rwc"),
            Some(Path::new("data/ledger.sqlite"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist and can be queried
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<TransactionModel> = Transaction::find().limit(1).all(&db).await?;
        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<EnvelopeModel> = Envelope::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_unique_envelope_name_per_user() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        let sobre = |user_id: i64| envelope::ActiveModel {
            user_id: Set(user_id),
            nombre: Set("Fondo".to_string()),
            icono: Set("💰".to_string()),
            saldo: Set(crate::money::Money::zero()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        sobre(1).insert(&db).await?;
        sobre(2).insert(&db).await?;
        let duplicate = sobre(1).insert(&db).await.map_err(Error::from);
        assert!(matches!(duplicate, Err(Error::Database(_))));
        Ok(())
    }
}
