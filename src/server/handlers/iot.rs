//! IoT devices, vendor data ingestion, and the MQTT placeholder.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use super::super::error::ApiError;
use super::super::AppState;
use crate::models::{IotDataRequest, IotDevice, IotDeviceInput, IotEvent, MqttMessage};

pub async fn list_iot_devices(
    State(state): State<AppState>,
) -> Result<Json<Vec<IotDevice>>, ApiError> {
    Ok(Json(state.db.iot_devices().list().await?))
}

pub async fn create_iot_device(
    State(state): State<AppState>,
    Json(input): Json<IotDeviceInput>,
) -> Result<Json<IotDevice>, ApiError> {
    input.validate()?;
    Ok(Json(state.db.iot_devices().create(&input).await?))
}

pub async fn get_iot_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IotDevice>, ApiError> {
    state
        .db
        .iot_devices()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("IoT device"))
}

pub async fn update_iot_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<IotDeviceInput>,
) -> Result<Json<IotDevice>, ApiError> {
    input.validate()?;
    state
        .db
        .iot_devices()
        .update(&id, &input)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("IoT device"))
}

pub async fn delete_iot_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IotDevice>, ApiError> {
    state
        .db
        .iot_devices()
        .delete(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("IoT device"))
}

/// Accept a data point from an external vendor.
pub async fn ingest_iot_data(
    State(state): State<AppState>,
    Json(data): Json<IotDataRequest>,
) -> Result<Json<Value>, ApiError> {
    data.validate()?;
    let event = state
        .db
        .iot_events()
        .ingest(&data.device_id, &data.payload)
        .await?;
    Ok(Json(json!({ "received": event.id })))
}

pub async fn list_iot_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<IotEvent>>, ApiError> {
    Ok(Json(state.db.iot_events().list().await?))
}

pub async fn publish_mqtt(
    State(state): State<AppState>,
    Json(message): Json<MqttMessage>,
) -> Result<Json<MqttMessage>, ApiError> {
    message.validate()?;
    Ok(Json(state.mqtt.publish(&message.topic, &message.payload)))
}

pub async fn list_mqtt_messages(State(state): State<AppState>) -> Json<Vec<MqttMessage>> {
    Json(state.mqtt.messages())
}
