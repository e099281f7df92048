use crate::{
    api::{SharedState, session::CurrentUser},
    core::stats::{self, Snapshot},
    errors::Result,
};
use axum::{Json, extract::State};
use tracing::instrument;

/// `{balance, income, expense}` over the caller's whole ledger.
#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<SharedState>,
    caller: CurrentUser,
) -> Result<Json<Snapshot>> {
    Ok(Json(stats::snapshot(&state.database, caller.user_id).await?))
}
