//! Shared test utilities for the ledger service.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.
#![allow(clippy::unwrap_used)]

use crate::{
    api::{ApiState, SharedState},
    config::AppConfig,
    core::{
        category::default_category_seeds,
        envelope,
        ledger::{self, NewTransaction},
        user,
    },
    entities::{self, TxKind},
    errors::Result,
    money::Money,
};
use sea_orm::{DatabaseConnection, prelude::Date};
use std::sync::Arc;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// API state over a fresh in-memory database with default configuration.
pub async fn setup_test_state() -> Result<SharedState> {
    let db = setup_test_db().await?;
    Ok(Arc::new(ApiState::new(db, &AppConfig::default())))
}

/// Parses a `YYYY-MM-DD` literal.
pub fn date(s: &str) -> Date {
    s.parse().unwrap()
}

/// Appends a transaction dated today.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    tipo: TxKind,
    categoria: &str,
    monto: Money,
) -> Result<entities::transaction::Model> {
    ledger::record_transaction(
        db,
        user_id,
        NewTransaction::new(chrono::Local::now().date_naive(), tipo, categoria, monto),
    )
    .await
}

/// Creates an empty envelope with the default icon.
pub async fn create_test_envelope(
    db: &DatabaseConnection,
    user_id: i64,
    nombre: &str,
) -> Result<entities::envelope::Model> {
    envelope::create_envelope(db, user_id, nombre, None).await
}

/// Creates a user with the default starter categories.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<entities::user::Model> {
    user::create_user(db, username, password, &default_category_seeds()).await
}
