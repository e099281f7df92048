//! HTTP mapping of crate errors and JSON extractors that reject with them.

use crate::errors::Error;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

/// JSON error body: `{"error": "...", "kind": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    /// Stable machine-readable kind, see [`Error::kind`]
    pub kind: &'static str,
}

impl Error {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::EnvelopeNotFound { .. }
            | Self::CategoryNotFound { .. }
            | Self::TransactionNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InvalidTransaction { .. }
            | Self::InvalidAmount { .. }
            | Self::InsufficientFunds { .. }
            | Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::PasswordHash { .. }
            | Self::AmountOverflow { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            warn!(error = %self, kind = self.kind(), "request rejected");
            self.to_string()
        };

        let body = ErrorBody {
            error: message,
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidInput {
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidInput {
            message: rejection.body_text(),
        }
    }
}

/// `axum::Json` that rejects with a structured [`Error`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` that rejects with a structured [`Error`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

/// `axum::extract::Path` that rejects with a structured [`Error`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

/// Answer for any unknown `/api` route.
pub async fn not_found() -> Response {
    let body = ErrorBody {
        error: "Not Found".to_string(),
        kind: "not_found",
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
