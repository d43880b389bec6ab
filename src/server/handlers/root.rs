use axum::Json;
use serde_json::{json, Value};

/// Service banner.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Codex backend API" }))
}
