use super::MonthQuery;
use crate::{
    api::{
        SharedState,
        error::{ApiJson, ApiPath, ApiQuery},
        session::CurrentUser,
    },
    core::{
        budget::{self, BudgetEntry, BudgetUsage},
        stats::{self, MonthlyBudgetReport},
    },
    errors::Result,
};
use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

/// Every configured limit, ordered by category.
#[instrument(skip(state))]
pub async fn list_budgets(
    State(state): State<SharedState>,
    caller: CurrentUser,
) -> Result<Json<Vec<BudgetEntry>>> {
    let budgets = budget::list_budgets(&state.database, caller.user_id).await?;
    Ok(Json(budgets.into_iter().map(BudgetEntry::from).collect()))
}

/// Upserts a batch of `{categoria, limite}` pairs, all or nothing.
#[instrument(skip(state))]
pub async fn set_budgets(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiJson(entries): ApiJson<Vec<BudgetEntry>>,
) -> Result<Json<Value>> {
    let _write_guard = state.write_lock.lock().await;
    let saved = budget::set_budgets(&state.database, caller.user_id, &entries).await?;
    Ok(Json(json!({ "success": true, "saved": saved.len() })))
}

/// Monthly budget report, leaving out envelope deposits.
#[instrument(skip(state))]
pub async fn monthly_usage(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<MonthlyBudgetReport>> {
    let month = query.resolve()?;
    let report = stats::monthly_budget_report(
        &state.database,
        caller.user_id,
        month,
        &[state.policy.deposit_category.as_str()],
    )
    .await?;
    Ok(Json(report))
}

/// Spend against one category's limit for `?month=` (default: current month).
#[instrument(skip(state))]
pub async fn category_usage(
    State(state): State<SharedState>,
    caller: CurrentUser,
    ApiPath(categoria): ApiPath<String>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<BudgetUsage>> {
    let month = query.resolve()?;
    let usage = budget::budget_usage(&state.database, caller.user_id, &categoria, month).await?;
    Ok(Json(usage))
}
