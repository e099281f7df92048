//! HTTP JSON API.
//!
//! Thin axum layer over [`crate::core`]: handlers extract the caller and the request
//! body, call one core operation, and serialize the result. Mutating handlers hold the
//! shared write lock for the duration of the call, so the database never sees two
//! writers at once. Read handlers take no lock.

/// Error to HTTP response mapping and rejecting extractors
pub mod error;
/// HTTP handlers, one module per resource
pub mod routes;
/// Session cookie handling and the `CurrentUser` extractor
pub mod session;

use crate::{
    auth::SessionStore,
    config::AppConfig,
    core::envelope::TransferPolicy,
};
use axum::{
    Json, Router,
    http::{HeaderValue, header},
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct ApiState {
    /// Connection pool every handler queries through
    pub database: DatabaseConnection,
    /// Sessions opened by `/api/login`
    pub sessions: SessionStore,
    /// How envelope transfers are booked
    pub policy: TransferPolicy,
    /// Serializes all mutating requests
    pub write_lock: Mutex<()>,
}

impl ApiState {
    /// State over `database`, with transfer policy and session lifetime from `config`.
    #[must_use]
    pub fn new(database: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            database,
            sessions: SessionStore::with_ttl(config.server.session_ttl()),
            policy: config.transfers.clone(),
            write_lock: Mutex::new(()),
        }
    }
}

/// State as held by the router.
pub type SharedState = Arc<ApiState>;

/// Success envelope: the payload's fields plus `"success": true`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    /// Always `true`
    pub success: bool,
    /// Payload fields, flattened next to `success`
    #[serde(flatten)]
    pub data: T,
}

/// Wraps `data` in a [`Success`] JSON body.
pub const fn success<T>(data: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        data,
    })
}

/// Builds the API router with tracing and security headers applied.
pub fn router(state: SharedState) -> Router {
    let api = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        .route(
            "/transactions",
            get(routes::transactions::list_transactions)
                .post(routes::transactions::create_transaction),
        )
        .route("/transactions/:id", get(routes::transactions::get_transaction))
        .route(
            "/savings",
            get(routes::savings::list_envelopes).post(routes::savings::create_envelope),
        )
        .route(
            "/savings/:id",
            axum::routing::delete(routes::savings::delete_envelope),
        )
        .route("/savings/:id/deposit", put(routes::savings::deposit))
        .route("/savings/:id/withdraw", put(routes::savings::withdraw))
        .route("/stats", get(routes::stats::get_stats))
        .route(
            "/categories",
            get(routes::categories::list_categories).post(routes::categories::create_category),
        )
        .route(
            "/categories/:id",
            axum::routing::delete(routes::categories::delete_category),
        )
        .route(
            "/category-budgets",
            get(routes::budgets::list_budgets).post(routes::budgets::set_budgets),
        )
        .route(
            "/category-budgets/usage",
            get(routes::budgets::monthly_usage),
        )
        .route(
            "/category-budgets/usage/:categoria",
            get(routes::budgets::category_usage),
        )
        .fallback(error::not_found);

    Router::new()
        .nest("/api", api)
        .fallback(error::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}
