use axum::extract::State;
use axum::Json;
use tracing::info;

use super::super::auth::{hash_password, AuthUser};
use super::super::error::{conflict_or_db, ApiError};
use super::super::AppState;
use crate::models::{SignupRequest, User};

/// Create an account. Usernames are unique.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<User>, ApiError> {
    request.validate()?;

    let users = state.db.users();
    if users.exists(&request.username).await? {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let cost = state.bcrypt_cost;
    let password = request.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    // A concurrent signup can still win the race; the unique index catches it.
    let user = users
        .create(&request.username, &hash)
        .await
        .map_err(|e| conflict_or_db(e, "Username"))?;

    info!("Created user {}", user.username);
    Ok(Json(user))
}

/// The authenticated caller.
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
