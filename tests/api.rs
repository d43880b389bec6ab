//! End-to-end API tests against a file-backed SQLite database.
//!
//! These go through the public crate surface only: settings, the database
//! context, and the router.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use codex_platform::config::Settings;
use codex_platform::llm::AnalysisConfig;
use codex_platform::server::{create_router, AppState};
use codex_platform::services::{MqttClient, UploadStorage};

async fn app_for(settings: &Settings) -> Router {
    let db = settings.create_db_context().unwrap();
    db.init_schema().await.unwrap();
    let state = AppState::from_parts(
        db,
        AnalysisConfig::default().with_endpoint("http://127.0.0.1:9/v1/chat/completions"),
        UploadStorage::new(&settings.uploads_dir),
        MqttClient::new(),
        4,
    )
    .unwrap();
    create_router(state)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn data_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::with_data_dir(dir.path().to_path_buf());
    settings.ensure_directories().unwrap();

    let app = app_for(&settings).await;
    let (status, _) = call(&app, "POST", "/visitors", Some(json!({"name": "Dana"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(
        &app,
        "POST",
        "/door-access/sync",
        Some(json!({"controller_url": "http://192.168.1.20"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    drop(app);

    // Re-running schema setup on an existing database is harmless
    let app = app_for(&settings).await;
    let (_, visitors) = call(&app, "GET", "/visitors", None).await;
    assert_eq!(visitors[0]["name"], "Dana");
    let (_, access) = call(&app, "GET", "/door-access", None).await;
    assert_eq!(access["last_synced_with"], "http://192.168.1.20");
}

#[tokio::test]
async fn door_panels_listed_by_name_and_replaced_on_update() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::with_data_dir(dir.path().to_path_buf());
    settings.ensure_directories().unwrap();
    let app = app_for(&settings).await;

    for (name, location) in [("Side Door", "West wing"), ("Main Door", "Lobby")] {
        let (status, _) = call(
            &app,
            "POST",
            "/door-panels",
            Some(json!({"name": name, "location": location})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, panels) = call(&app, "GET", "/door-panels", None).await;
    let names: Vec<&str> = panels
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Main Door", "Side Door"]);

    let id = panels[0]["id"].as_str().unwrap();
    let (status, updated) = call(
        &app,
        "PUT",
        &format!("/door-panels/{id}"),
        Some(json!({"name": "Front Door"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Front Door");
    assert_eq!(updated["location"], Value::Null);
}

#[tokio::test]
async fn iot_devices_and_events() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::with_data_dir(dir.path().to_path_buf());
    settings.ensure_directories().unwrap();
    let app = app_for(&settings).await;

    let (status, device) = call(
        &app,
        "POST",
        "/iot/devices",
        Some(json!({"device_id": "thermo-7"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(device["device_id"], "thermo-7");

    for reading in [19.0, 20.5] {
        call(
            &app,
            "POST",
            "/iot/data",
            Some(json!({"device_id": "thermo-7", "payload": {"temp": reading}})),
        )
        .await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (_, events) = call(&app, "GET", "/iot/data", None).await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["payload"]["temp"], 20.5);

    let (status, _) = call(&app, "POST", "/iot/data", Some(json!({"device_id": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
