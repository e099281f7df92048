use crate::{
    api::{
        SharedState,
        error::ApiJson,
        session::{CurrentUser, expired_session_cookie, session_cookie},
        success,
    },
    core::user,
    errors::Result,
};
use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

/// `POST /api/login` body.
#[derive(Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Plain-text password, never logged
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// `GET /api/me` response.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// User id
    pub id: i64,
    /// Login name
    pub username: String,
}

/// Verifies credentials and sets the session cookie.
#[instrument(skip(state))]
pub async fn login(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Response> {
    let found =
        user::verify_credentials(&state.database, &request.username, &request.password).await?;
    let token = state.sessions.create(found.id, &found.username).await;

    info!(user_id = found.id, "login");
    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        success(MeResponse {
            id: found.id,
            username: found.username,
        }),
    )
        .into_response())
}

/// Ends the caller's session and clears the cookie.
#[instrument(skip(state))]
pub async fn logout(State(state): State<SharedState>, caller: CurrentUser) -> Response {
    state.sessions.remove(&caller.token).await;
    info!(user_id = caller.user_id, "logout");
    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// Who is calling.
pub async fn me(caller: CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: caller.user_id,
        username: caller.username,
    })
}
