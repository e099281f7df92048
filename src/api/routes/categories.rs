use crate::{
    api::{
        SharedState, Success,
        error::{ApiJson, ApiPath},
        session::CurrentUser,
        success,
    },
    core::category,
    entities::{TxKind, category as category_entity},
    errors::{Error, Result},
};
use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

/// `POST /api/categories` body.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name
    pub nombre: String,
    /// `ingreso` or `gasto`
    pub tipo: String,
}

/// The caller's categories.
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<SharedState>,
    caller: CurrentUser,
) -> Result<Json<Vec<category_entity::Model>>> {
    Ok(Json(
        category::list_categories(&state.database, caller.user_id).await?,
    ))
}

/// Registers a category; repeating an existing one is a no-op.
#[instrument(skip(state))]
pub async fn create_category(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiJson(request): ApiJson<CreateCategoryRequest>,
) -> Result<Json<Success<category_entity::Model>>> {
    let tipo: TxKind = request.tipo.parse().map_err(|_| Error::InvalidInput {
        message: format!("tipo must be 'ingreso' or 'gasto', got '{}'", request.tipo),
    })?;

    let _write_guard = state.write_lock.lock().await;
    let created =
        category::create_category(&state.database, caller.user_id, &request.nombre, tipo).await?;
    Ok(success(created))
}

/// Removes the registry entry; transactions keep their category name.
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>> {
    let _write_guard = state.write_lock.lock().await;
    category::delete_category(&state.database, caller.user_id, id).await?;
    Ok(Json(json!({ "success": true })))
}
