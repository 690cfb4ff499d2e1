//! Read-only handlers polled by Home Assistant

use axum::{extract::State, Json};
use serde_json::{Map, Value};

use crate::api::reshape;
use crate::error::GatewayError;
use crate::state::GatewayState;

/// GET /api/v1/rooms - Room ids keyed by slug
pub async fn get_rooms(
    State(state): State<GatewayState>,
) -> Result<Json<Map<String, Value>>, GatewayError> {
    let overview = state.operations.property_overview().await?;
    Ok(Json(reshape::rooms(&overview.property)))
}

/// GET /api/v1/sensors - Per-room readings
pub async fn get_sensors(
    State(state): State<GatewayState>,
) -> Result<Json<Map<String, Value>>, GatewayError> {
    let overview = state.operations.property_overview().await?;
    Ok(Json(reshape::sensors(&overview.property)))
}

/// GET /api/v1/modes - Global mode flags
pub async fn get_modes(
    State(state): State<GatewayState>,
) -> Result<Json<Map<String, Value>>, GatewayError> {
    let overview = state.operations.property_overview().await?;
    Ok(Json(reshape::modes(&overview.property)))
}

/// GET /api/v1/summary - Modes and room readings in one flat object
pub async fn get_summary(
    State(state): State<GatewayState>,
) -> Result<Json<Map<String, Value>>, GatewayError> {
    let overview = state.operations.property_overview().await?;
    Ok(Json(reshape::summary(&overview.property)))
}

/// GET /api/v1/consumption - Vendor consumption summary, untouched
pub async fn get_consumption(
    State(state): State<GatewayState>,
) -> Result<Json<Value>, GatewayError> {
    Ok(Json(state.operations.fetch_consumption().await?))
}
