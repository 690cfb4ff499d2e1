//! API module - HTTP handlers and routes

pub mod handlers;
pub mod reshape;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::GatewayState;

pub fn routes() -> Router<GatewayState> {
    let v1 = Router::new()
        .route("/health", get(handlers::health_check))
        // Readings
        .route("/rooms", get(handlers::get_rooms))
        .route("/sensors", get(handlers::get_sensors))
        .route("/modes", get(handlers::get_modes))
        .route("/summary", get(handlers::get_summary))
        .route("/consumption", get(handlers::get_consumption))
        // Commands
        .route("/:room_id/temperature", put(handlers::set_room_temperature))
        .route("/mode/:mode", put(handlers::set_mode))
        // Connection setup
        .route("/test-connection", post(handlers::test_connection))
        .route("/save-connection", post(handlers::save_connection))
        .route("/status", get(handlers::get_status))
        .route("/reauthenticate", post(handlers::reauthenticate))
        // Home Assistant configuration
        .route("/configuration/yaml", get(handlers::get_configuration_yaml));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", v1)
}
