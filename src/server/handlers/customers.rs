//! Customer CRUD endpoints.

use axum::extract::{Path, State};
use axum::Json;

use super::super::error::ApiError;
use super::super::AppState;
use crate::models::{Customer, CustomerInput};

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.db.customers().list().await?))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, ApiError> {
    input.validate()?;
    Ok(Json(state.db.customers().create(&input).await?))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    state
        .db
        .customers()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Customer"))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, ApiError> {
    input.validate()?;
    state
        .db
        .customers()
        .update(&id, &input)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Customer"))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    state
        .db
        .customers()
        .delete(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Customer"))
}
