//! HTTP Basic authentication against the user store.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::Engine;
use tracing::debug;

use super::error::ApiError;
use super::AppState;
use crate::models::User;

/// Decode an `Authorization: Basic ...` header value into (username, password).
pub fn parse_basic_auth(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Hash a password with the configured bcrypt cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    bcrypt::hash(password, cost)
        .map_err(|e| ApiError::Internal(format!("hashing failed: {}", e)))
}

/// Check a username/password pair. Every failure mode yields `Unauthorized`.
pub async fn authenticate(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<User, ApiError> {
    let creds = state.db.users().find_credentials(username).await?;

    let (hash, user) = match creds {
        Some(c) => (c.password_hash, Some(c.user)),
        // Unknown users still pay for one verify
        None => (state.dummy_hash.to_string(), None),
    };

    let password = password.to_string();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .unwrap_or(false);

    match user {
        Some(user) if verified => Ok(user),
        _ => {
            debug!("Rejected credentials for {}", username);
            Err(ApiError::Unauthorized)
        }
    }
}

/// Extractor for handlers that require a signed-in user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (username, password) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_basic_auth)
            .ok_or(ApiError::Unauthorized)?;

        authenticate(state, &username, &password).await.map(AuthUser)
    }
}
