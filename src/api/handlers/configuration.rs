//! Home Assistant configuration export

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};

use crate::error::AppError;
use crate::hass;
use crate::state::GatewayState;

/// GET /api/v1/configuration/yaml - Generated `tiko:` package
pub async fn get_configuration_yaml(
    State(state): State<GatewayState>,
) -> Result<impl IntoResponse, AppError> {
    let overview = state.operations.property_overview().await?;
    let base_url = state.public_address.read().await.base_url();

    let yaml = hass::render_configuration(&overview, &base_url)
        .map_err(|e| AppError::InternalError(format!("YAML rendering failed: {}", e)))?;

    Ok(([(CONTENT_TYPE, "text/yaml; charset=utf-8")], yaml))
}
