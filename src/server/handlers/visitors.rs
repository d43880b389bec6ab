use axum::extract::{Path, State};
use axum::Json;

use super::super::error::ApiError;
use super::super::AppState;
use crate::models::{Visitor, VisitorInput};

pub async fn list_visitors(
    State(state): State<AppState>,
) -> Result<Json<Vec<Visitor>>, ApiError> {
    Ok(Json(state.db.visitors().list().await?))
}

pub async fn create_visitor(
    State(state): State<AppState>,
    Json(input): Json<VisitorInput>,
) -> Result<Json<Visitor>, ApiError> {
    input.validate()?;
    Ok(Json(state.db.visitors().create(&input).await?))
}

pub async fn get_visitor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Visitor>, ApiError> {
    state
        .db
        .visitors()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Visitor"))
}

pub async fn update_visitor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<VisitorInput>,
) -> Result<Json<Visitor>, ApiError> {
    input.validate()?;
    state
        .db
        .visitors()
        .update(&id, &input)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Visitor"))
}

pub async fn delete_visitor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Visitor>, ApiError> {
    state
        .db
        .visitors()
        .delete(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Visitor"))
}
