//! HTTP API for the platform.
//!
//! Serves CRUD endpoints for customers, visitors, door panels and groups, and
//! IoT devices, plus the controller sync, MQTT placeholder, and the
//! authenticated document-analysis pipeline.

mod auth;
pub mod error;
mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::llm::{AnalysisClient, AnalysisConfig};
use crate::repository::DbContext;
use crate::services::{AnalysisService, MqttClient, UploadStorage};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub db: DbContext,
    pub analysis: AnalysisService,
    pub mqtt: MqttClient,
    /// bcrypt work factor for new accounts.
    pub bcrypt_cost: u32,
    /// Hash verified against when a username is unknown, so failed logins
    /// take the same time either way.
    pub dummy_hash: Arc<str>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db = settings.create_db_context()?;
        Self::from_parts(
            db,
            settings.analysis.clone(),
            UploadStorage::new(&settings.uploads_dir),
            MqttClient::new(),
            settings.bcrypt_cost,
        )
    }

    pub fn from_parts(
        db: DbContext,
        analysis: AnalysisConfig,
        storage: UploadStorage,
        mqtt: MqttClient,
        bcrypt_cost: u32,
    ) -> anyhow::Result<Self> {
        let client = AnalysisClient::new(analysis)?;
        let analysis = AnalysisService::new(client, storage, db.documents());
        let dummy_hash = bcrypt::hash("codex-unknown-user", bcrypt_cost)?;

        Ok(Self {
            db,
            analysis,
            mqtt,
            bcrypt_cost,
            dummy_hash: Arc::from(dummy_hash),
        })
    }
}

/// Start the web server. The schema must already be in place.
pub async fn serve(settings: &Settings, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;

    state
        .mqtt
        .connect(&settings.mqtt_broker_url, settings.mqtt_port);
    state.mqtt.loop_start();

    let app = create_router(state);

    tracing::info!("Starting server at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
