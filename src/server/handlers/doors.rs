//! Door panels, door groups, and controller sync.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use tracing::info;

use super::super::error::ApiError;
use super::super::AppState;
use crate::models::{
    DoorAccessState, DoorAccessSyncRequest, DoorGroup, DoorGroupInput, DoorPanel, DoorPanelInput,
};

pub async fn list_door_panels(
    State(state): State<AppState>,
) -> Result<Json<Vec<DoorPanel>>, ApiError> {
    Ok(Json(state.db.door_panels().list().await?))
}

pub async fn create_door_panel(
    State(state): State<AppState>,
    Json(input): Json<DoorPanelInput>,
) -> Result<Json<DoorPanel>, ApiError> {
    input.validate()?;
    Ok(Json(state.db.door_panels().create(&input).await?))
}

pub async fn get_door_panel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DoorPanel>, ApiError> {
    state
        .db
        .door_panels()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Door panel"))
}

pub async fn update_door_panel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<DoorPanelInput>,
) -> Result<Json<DoorPanel>, ApiError> {
    input.validate()?;
    state
        .db
        .door_panels()
        .update(&id, &input)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Door panel"))
}

pub async fn delete_door_panel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DoorPanel>, ApiError> {
    state
        .db
        .door_panels()
        .delete(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Door panel"))
}

pub async fn list_door_groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<DoorGroup>>, ApiError> {
    Ok(Json(state.db.door_groups().list().await?))
}

pub async fn create_door_group(
    State(state): State<AppState>,
    Json(input): Json<DoorGroupInput>,
) -> Result<Json<DoorGroup>, ApiError> {
    input.validate()?;
    Ok(Json(state.db.door_groups().create(&input).await?))
}

pub async fn get_door_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DoorGroup>, ApiError> {
    state
        .db
        .door_groups()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Door group"))
}

pub async fn update_door_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<DoorGroupInput>,
) -> Result<Json<DoorGroup>, ApiError> {
    input.validate()?;
    state
        .db
        .door_groups()
        .update(&id, &input)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Door group"))
}

pub async fn delete_door_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DoorGroup>, ApiError> {
    state
        .db
        .door_groups()
        .delete(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Door group"))
}

/// Record a sync with the local door-access controller.
///
/// No request is made to the controller; only the sync state is stored.
pub async fn sync_door_access(
    State(state): State<AppState>,
    Json(request): Json<DoorAccessSyncRequest>,
) -> Result<Json<DoorAccessState>, ApiError> {
    request.validate()?;
    let controller_url = request.controller_url.trim();
    info!("Door access sync with {}", controller_url);

    let synced = state
        .db
        .door_access()
        .record_sync(controller_url, Utc::now())
        .await?;
    Ok(Json(synced))
}

pub async fn get_door_access(
    State(state): State<AppState>,
) -> Result<Json<DoorAccessState>, ApiError> {
    Ok(Json(state.db.door_access().get().await?))
}
