use crate::{
    api::{
        SharedState, Success,
        error::{ApiJson, ApiPath},
        session::CurrentUser,
        success,
    },
    core::envelope,
    entities::envelope as envelope_entity,
    errors::Result,
    money::Money,
};
use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

/// `POST /api/savings` body.
#[derive(Debug, Deserialize)]
pub struct CreateEnvelopeRequest {
    /// Envelope name, unique per user
    pub nombre: String,
    /// Display icon, defaults to 💰
    #[serde(default)]
    pub icono: Option<String>,
}

/// Body of a deposit or withdrawal.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Positive amount to move
    pub monto: Money,
}

/// The caller's envelopes by name.
#[instrument(skip(state))]
pub async fn list_envelopes(
    State(state): State<SharedState>,
    caller: CurrentUser,
) -> Result<Json<Vec<envelope_entity::Model>>> {
    Ok(Json(
        envelope::get_all_envelopes(&state.database, caller.user_id).await?,
    ))
}

/// Creates an empty envelope.
#[instrument(skip(state))]
pub async fn create_envelope(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiJson(request): ApiJson<CreateEnvelopeRequest>,
) -> Result<Json<Success<envelope_entity::Model>>> {
    let _write_guard = state.write_lock.lock().await;
    let created = envelope::create_envelope(
        &state.database,
        caller.user_id,
        &request.nombre,
        request.icono.as_deref(),
    )
    .await?;
    Ok(success(created))
}

/// Moves money from the general balance into the envelope.
#[instrument(skip(state))]
pub async fn deposit(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<TransferRequest>,
) -> Result<Json<Success<envelope_entity::Model>>> {
    let _write_guard = state.write_lock.lock().await;
    let updated = envelope::deposit(
        &state.database,
        caller.user_id,
        id,
        request.monto,
        &state.policy,
    )
    .await?;
    Ok(success(updated))
}

/// Moves money from the envelope back into the general balance.
#[instrument(skip(state))]
pub async fn withdraw(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<TransferRequest>,
) -> Result<Json<Success<envelope_entity::Model>>> {
    let _write_guard = state.write_lock.lock().await;
    let updated = envelope::withdraw(
        &state.database,
        caller.user_id,
        id,
        request.monto,
        &state.policy,
    )
    .await?;
    Ok(success(updated))
}

/// Deletes an envelope whose saldo is zero.
#[instrument(skip(state))]
pub async fn delete_envelope(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>> {
    let _write_guard = state.write_lock.lock().await;
    envelope::delete_envelope(&state.database, caller.user_id, id).await?;
    Ok(Json(json!({ "success": true })))
}
