use crate::{
    api::{
        SharedState, Success,
        error::{ApiPath, ApiQuery},
        session::CurrentUser,
        success,
    },
    core::ledger::{self, NewTransaction, TransactionFilter},
    entities::{TxKind, transaction},
    errors::{Error, Result},
    money::Money,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use sea_orm::prelude::Date;
use serde::Deserialize;
use tracing::instrument;

/// `POST /api/transactions` body.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// `YYYY-MM-DD`
    pub fecha: Date,
    /// `ingreso` or `gasto`; anything else is an invalid transaction
    pub tipo: String,
    /// Category name, registered when new
    pub categoria: String,
    /// Non-negative amount
    pub monto: Money,
    /// Optional free text
    #[serde(default)]
    pub descripcion: Option<String>,
}

impl TryFrom<CreateTransactionRequest> for NewTransaction {
    type Error = Error;

    fn try_from(request: CreateTransactionRequest) -> Result<Self> {
        let tipo: TxKind = request.tipo.parse()?;
        let mut new = Self::new(request.fecha, tipo, request.categoria, request.monto);
        new.descripcion = request.descripcion;
        Ok(new)
    }
}

/// Lists the caller's transactions in insertion order, optionally filtered by
/// `from`, `to` (inclusive `YYYY-MM-DD`) and `categoria`.
#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiQuery(filter): ApiQuery<TransactionFilter>,
) -> Result<Json<Vec<transaction::Model>>> {
    let entries = ledger::list_transactions(&state.database, caller.user_id, &filter).await?;
    Ok(Json(entries))
}

/// Appends a transaction to the caller's ledger.
///
/// A well-formed JSON body whose fields do not make a transaction (missing or
/// mistyped `monto`, unparseable `fecha`) is rejected as an invalid transaction.
#[instrument(skip(state, payload))]
pub async fn create_transaction(
    State(state): State<SharedState>,
    caller: CurrentUser,
    payload: std::result::Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<Json<Success<transaction::Model>>> {
    let Json(request) = payload.map_err(|rejection| match rejection {
        JsonRejection::JsonDataError(err) => Error::InvalidTransaction {
            reason: err.body_text(),
        },
        other => Error::from(other),
    })?;
    let new = NewTransaction::try_from(request)?;

    let _write_guard = state.write_lock.lock().await;
    let created = ledger::record_transaction(&state.database, caller.user_id, new).await?;
    Ok(success(created))
}

/// One of the caller's transactions by id.
#[instrument(skip(state))]
pub async fn get_transaction(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<transaction::Model>> {
    ledger::get_transaction_by_id(&state.database, caller.user_id, id)
        .await?
        .map(Json)
        .ok_or(Error::TransactionNotFound { id })
}
