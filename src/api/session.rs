//! Cookie-based caller identity.
//!
//! The `auth_token` cookie carries a session token issued at login. Handlers that take a
//! [`CurrentUser`] only run for requests with a live session; everything else gets 401.

use super::SharedState;
use crate::errors::Error;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth_token";

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Owner of every row the request touches
    pub user_id: i64,
    /// Login name
    pub username: String,
    /// Session token the request presented
    pub token: String,
}

/// Extracts the session token from the request's cookies.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == AUTH_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value that stores `token`.
#[must_use]
pub fn session_cookie(token: &str) -> String {
    format!("{AUTH_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax")
}

/// `Set-Cookie` value that clears the session cookie.
#[must_use]
pub fn expired_session_cookie() -> String {
    format!("{AUTH_COOKIE}=; Max-Age=0; HttpOnly; Path=/; SameSite=Lax")
}

#[async_trait]
impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(Error::Unauthorized)?;
        let session = state
            .sessions
            .get(&token)
            .await
            .ok_or(Error::Unauthorized)?;

        Ok(Self {
            user_id: session.user_id,
            username: session.username,
            token,
        })
    }
}
