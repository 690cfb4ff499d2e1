//! Write handlers: room temperature and heating mode

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::error::{AppError, GatewayError};
use crate::state::GatewayState;

#[derive(Debug, Deserialize)]
pub struct TemperatureQuery {
    pub temp: f64,
}

/// PUT /api/v1/:room_id/temperature?temp= - Adjust one room's target
///
/// NaN and infinities have no JSON encoding, so they never reach the vendor.
pub async fn set_room_temperature(
    State(state): State<GatewayState>,
    Path(room_id): Path<i64>,
    Query(query): Query<TemperatureQuery>,
) -> Result<StatusCode, AppError> {
    if !query.temp.is_finite() {
        return Err(AppError::BadRequest(format!(
            "Temperature must be a finite number, got {}",
            query.temp
        )));
    }

    state
        .operations
        .set_room_temperature(room_id, query.temp)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// PUT /api/v1/mode/:mode - Switch the global mode ("false" clears it)
pub async fn set_mode(
    State(state): State<GatewayState>,
    Path(mode): Path<String>,
) -> Result<StatusCode, GatewayError> {
    state.operations.set_mode(&mode).await?;
    Ok(StatusCode::ACCEPTED)
}
