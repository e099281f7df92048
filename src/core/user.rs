//! User accounts - The identities that own ledgers.
//!
//! A user is created with a hashed password and a starter set of categories. Login
//! checks credentials here; sessions themselves live in [`crate::auth`].

use crate::{
    auth::{hash_password, verify_password},
    core::category::{self, CategorySeed},
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// Finds a user by login name.
pub async fn get_user_by_username<C>(db: &C, username: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a user and seeds their categories in one database transaction.
///
/// Fails with [`Error::Conflict`] when the username is taken.
pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    seeds: &[CategorySeed],
) -> Result<user::Model> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(Error::InvalidInput {
            message: "Username and password are required".to_string(),
        });
    }

    let password_hash = hash_password(password)?;

    let txn = db.begin().await?;

    if get_user_by_username(&txn, username).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("User '{username}' already exists"),
        });
    }

    let created = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    category::seed_categories(&txn, created.id, seeds).await?;

    txn.commit().await?;

    info!(user_id = created.id, username, "user created");
    Ok(created)
}

/// Makes sure `username` exists and logs in with `password`.
///
/// Creates the user when missing; an existing user whose stored hash does not match
/// gets the password re-hashed.
pub async fn ensure_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    seeds: &[CategorySeed],
) -> Result<user::Model> {
    let Some(existing) = get_user_by_username(db, username).await? else {
        return create_user(db, username, password, seeds).await;
    };

    if verify_password(password, &existing.password_hash).unwrap_or(false) {
        return Ok(existing);
    }

    warn!(user_id = existing.id, "stored password differs from configured one, updating");
    let mut active: user::ActiveModel = existing.into();
    active.password_hash = Set(hash_password(password)?);
    Ok(active.update(db).await?)
}

/// Returns the user when `password` matches, [`Error::InvalidCredentials`] otherwise.
pub async fn verify_credentials<C>(db: &C, username: &str, password: &str) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let Some(found) = get_user_by_username(db, username).await? else {
        return Err(Error::InvalidCredentials);
    };

    if verify_password(password, &found.password_hash)? {
        Ok(found)
    } else {
        Err(Error::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::category::default_category_seeds, test_utils::setup_test_db};

    #[tokio::test]
    async fn test_create_user_seeds_categories() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_user(&db, "ana", "secreto", &default_category_seeds()).await?;
        assert_eq!(created.username, "ana");
        assert_ne!(created.password_hash, "secreto");

        let categories = category::list_categories(&db, created.id).await?;
        assert_eq!(categories.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_duplicate_and_blank() -> Result<()> {
        let db = setup_test_db().await?;

        create_user(&db, "ana", "secreto", &[]).await?;
        let result = create_user(&db, " ana ", "otro", &[]).await;
        assert!(matches!(result, Err(Error::Conflict { message: _ })));

        let result = create_user(&db, "", "secreto", &[]).await;
        assert!(matches!(result, Err(Error::InvalidInput { message: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_verify_credentials() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_user(&db, "ana", "secreto", &[]).await?;

        let found = verify_credentials(&db, "ana", "secreto").await?;
        assert_eq!(found.id, created.id);
        assert_eq!(get_user_by_username(&db, "ana").await?, Some(found));

        let wrong = verify_credentials(&db, "ana", "nope").await;
        assert!(matches!(wrong, Err(Error::InvalidCredentials)));

        let unknown = verify_credentials(&db, "bob", "secreto").await;
        assert!(matches!(unknown, Err(Error::InvalidCredentials)));
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent_and_rotates_password() -> Result<()> {
        let db = setup_test_db().await?;

        let first = ensure_user(&db, "admin", "uno", &default_category_seeds()).await?;
        let second = ensure_user(&db, "admin", "uno", &default_category_seeds()).await?;
        assert_eq!(first, second);

        ensure_user(&db, "admin", "dos", &default_category_seeds()).await?;
        assert!(verify_credentials(&db, "admin", "dos").await.is_ok());
        assert!(verify_credentials(&db, "admin", "uno").await.is_err());
        assert_eq!(category::list_categories(&db, first.id).await?.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_second_user_gets_own_configured_seeds() -> Result<()> {
        let db = setup_test_db().await?;
        let config = crate::config::settings::parse_config(
            "default_categories = [{ nombre = \"Mercado\", tipo = \"gasto\" }]",
        )?;

        let ana = create_user(&db, "ana", "secreto", &default_category_seeds()).await?;
        let bob = create_user(&db, "bob", "clave", &config.default_categories).await?;
        assert_ne!(ana.id, bob.id);

        let names: Vec<_> = category::list_categories(&db, bob.id)
            .await?
            .into_iter()
            .map(|c| c.nombre)
            .collect();
        assert_eq!(names, vec!["Mercado"]);
        assert_eq!(category::list_categories(&db, ana.id).await?.len(), 4);
        Ok(())
    }
}
