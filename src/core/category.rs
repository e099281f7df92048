//! Category registry - Owns the set of named categories per user.
//!
//! The registry is open: ledger appends and budget updates auto-create any
//! category they reference through [`ensure_category_exists`], so it stays the
//! single authority the rest of the system queries. Deleting a category only
//! removes the registry entry; transactions keep their `categoria` string.

use crate::{
    entities::{Category, TxKind, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// A category created for every new user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategorySeed {
    /// Category name
    pub nombre: String,
    /// Income or expense
    pub tipo: TxKind,
}

impl CategorySeed {
    /// Creates a seed entry.
    #[must_use]
    pub fn new(nombre: &str, tipo: TxKind) -> Self {
        Self {
            nombre: nombre.to_string(),
            tipo,
        }
    }
}

/// The categories a fresh ledger starts with.
#[must_use]
pub fn default_category_seeds() -> Vec<CategorySeed> {
    vec![
        CategorySeed::new("Comida", TxKind::Gasto),
        CategorySeed::new("Transporte", TxKind::Gasto),
        CategorySeed::new("Salario", TxKind::Ingreso),
        CategorySeed::new("Otros", TxKind::Gasto),
    ]
}

fn normalize_name(nombre: &str) -> Result<String> {
    let trimmed = nombre.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput {
            message: "Category name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Lists a user's categories ordered by name.
pub async fn list_categories<C>(db: &C, user_id: i64) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Nombre)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by exact name.
pub async fn get_category_by_name<C>(
    db: &C,
    user_id: i64,
    nombre: &str,
) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Nombre.eq(nombre.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a category.
///
/// Creating a name that already exists with the same kind returns the existing
/// entry; the same name with the other kind fails with [`Error::Conflict`].
pub async fn create_category<C>(
    db: &C,
    user_id: i64,
    nombre: &str,
    tipo: TxKind,
) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let nombre = normalize_name(nombre)?;

    if let Some(existing) = get_category_by_name(db, user_id, &nombre).await? {
        if existing.tipo == tipo {
            return Ok(existing);
        }
        return Err(Error::Conflict {
            message: format!(
                "Category '{}' already exists as '{}'",
                existing.nombre,
                existing.tipo.as_str()
            ),
        });
    }

    let model = category::ActiveModel {
        user_id: Set(user_id),
        nombre: Set(nombre),
        tipo: Set(tipo),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Returns the named category, registering it with `tipo` when it is missing.
///
/// An existing entry is returned untouched even if its kind differs: the
/// registry classifies names, it does not police the ledger.
pub async fn ensure_category_exists<C>(
    db: &C,
    user_id: i64,
    nombre: &str,
    tipo: TxKind,
) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let nombre = normalize_name(nombre)?;
    if let Some(existing) = get_category_by_name(db, user_id, &nombre).await? {
        return Ok(existing);
    }

    tracing::debug!(user_id, %nombre, tipo = tipo.as_str(), "auto-registering category");
    let model = category::ActiveModel {
        user_id: Set(user_id),
        nombre: Set(nombre),
        tipo: Set(tipo),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Deletes a category by id. Existing transactions are not modified.
pub async fn delete_category<C>(db: &C, user_id: i64, category_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Category::delete_many()
        .filter(category::Column::Id.eq(category_id))
        .filter(category::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::CategoryNotFound {
            name: category_id.to_string(),
        });
    }
    Ok(())
}

/// Deletes a category by name. Existing transactions are not modified.
pub async fn delete_category_by_name<C>(db: &C, user_id: i64, nombre: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = get_category_by_name(db, user_id, nombre)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: nombre.to_string(),
        })?;
    delete_category(db, user_id, existing.id).await
}

/// Registers every seed the user does not have yet.
pub async fn seed_categories<C>(db: &C, user_id: i64, seeds: &[CategorySeed]) -> Result<()>
where
    C: ConnectionTrait,
{
    for seed in seeds {
        ensure_category_exists(db, user_id, &seed.nombre, seed.tipo).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::ledger,
        money::Money,
        test_utils::{create_test_transaction, setup_test_db},
    };
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_category_rejects_empty_name() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_category(&db, 1, "   ", TxKind::Gasto).await;
        assert!(matches!(result, Err(Error::InvalidInput { message: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_list_categories() -> Result<()> {
        let db = setup_test_db().await?;

        create_category(&db, 1, "Transporte", TxKind::Gasto).await?;
        create_category(&db, 1, "Beca", TxKind::Ingreso).await?;
        create_category(&db, 2, "Otro usuario", TxKind::Gasto).await?;

        let categories = list_categories(&db, 1).await?;
        let names: Vec<_> = categories.iter().map(|c| c.nombre.as_str()).collect();
        assert_eq!(names, vec!["Beca", "Transporte"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_is_idempotent_for_same_kind() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_category(&db, 1, "Comida", TxKind::Gasto).await?;
        let second = create_category(&db, 1, " Comida ", TxKind::Gasto).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(list_categories(&db, 1).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_conflicting_kind() -> Result<()> {
        let db = setup_test_db().await?;

        create_category(&db, 1, "Salario", TxKind::Ingreso).await?;
        let result = create_category(&db, 1, "Salario", TxKind::Gasto).await;
        assert!(matches!(result, Err(Error::Conflict { message: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_category_exists_keeps_existing_kind() -> Result<()> {
        let db = setup_test_db().await?;

        let created = ensure_category_exists(&db, 1, "Ahorro", TxKind::Gasto).await?;
        let again = ensure_category_exists(&db, 1, "Ahorro", TxKind::Ingreso).await?;
        assert_eq!(created.id, again.id);
        assert_eq!(again.tipo, TxKind::Gasto);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_category_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = delete_category(&db, 1, 999).await;
        assert!(matches!(result, Err(Error::CategoryNotFound { name: _ })));

        // Another user's category is invisible too
        let other = create_category(&db, 2, "Privada", TxKind::Gasto).await?;
        let result = delete_category(&db, 1, other.id).await;
        assert!(matches!(result, Err(Error::CategoryNotFound { name: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_category_keeps_transactions() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_transaction(&db, 1, TxKind::Gasto, "Comida", Money::from_major(120)).await?;
        let before = ledger::list_transactions(&db, 1, &ledger::TransactionFilter::default()).await?;
        let spent_before = ledger::sum_by_category(&db, 1, "Comida", None, None).await?;

        delete_category_by_name(&db, 1, "Comida").await?;

        assert!(get_category_by_name(&db, 1, "Comida").await?.is_none());
        let after = ledger::list_transactions(&db, 1, &ledger::TransactionFilter::default()).await?;
        assert_eq!(before, after);
        assert_eq!(after[0].categoria, "Comida");
        let spent_after = ledger::sum_by_category(&db, 1, "Comida", None, None).await?;
        assert_eq!(spent_before, spent_after);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_categories() -> Result<()> {
        let db = setup_test_db().await?;

        seed_categories(&db, 7, &default_category_seeds()).await?;
        seed_categories(&db, 7, &default_category_seeds()).await?;

        let categories = list_categories(&db, 7).await?;
        assert_eq!(categories.len(), 4);
        let salario = categories.iter().find(|c| c.nombre == "Salario").unwrap();
        assert_eq!(salario.tipo, TxKind::Ingreso);
        Ok(())
    }
}
