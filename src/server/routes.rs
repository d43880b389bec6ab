//! Router configuration for the API server.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Largest accepted request body (uploads included).
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        // Accounts
        .route("/signup", post(handlers::signup))
        .route("/me", get(handlers::me))
        // Customers and visitors
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/customers/:id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route(
            "/visitors",
            get(handlers::list_visitors).post(handlers::create_visitor),
        )
        .route(
            "/visitors/:id",
            get(handlers::get_visitor)
                .put(handlers::update_visitor)
                .delete(handlers::delete_visitor),
        )
        // Door access
        .route(
            "/door-panels",
            get(handlers::list_door_panels).post(handlers::create_door_panel),
        )
        .route(
            "/door-panels/:id",
            get(handlers::get_door_panel)
                .put(handlers::update_door_panel)
                .delete(handlers::delete_door_panel),
        )
        .route(
            "/door-groups",
            get(handlers::list_door_groups).post(handlers::create_door_group),
        )
        .route(
            "/door-groups/:id",
            get(handlers::get_door_group)
                .put(handlers::update_door_group)
                .delete(handlers::delete_door_group),
        )
        .route("/door-access", get(handlers::get_door_access))
        .route("/door-access/sync", post(handlers::sync_door_access))
        // IoT
        .route(
            "/iot/devices",
            get(handlers::list_iot_devices).post(handlers::create_iot_device),
        )
        .route(
            "/iot/devices/:id",
            get(handlers::get_iot_device)
                .put(handlers::update_iot_device)
                .delete(handlers::delete_iot_device),
        )
        .route(
            "/iot/data",
            get(handlers::list_iot_data).post(handlers::ingest_iot_data),
        )
        .route("/iot/mqtt", post(handlers::publish_mqtt))
        .route("/iot/mqtt/messages", get(handlers::list_mqtt_messages))
        // Document analysis
        .route("/analyze", post(handlers::analyze_document))
        .route("/documents", get(handlers::list_documents))
        .route("/documents/:id", get(handlers::get_document))
        .route("/analysis-presets", get(handlers::list_presets))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
