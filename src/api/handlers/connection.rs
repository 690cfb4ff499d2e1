//! Connection setup handlers (used by the setup pages)

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::config::ConnectionSettings;
use crate::error::AppError;
use crate::models::Credential;
use crate::state::GatewayState;

use super::SuccessResponse;

#[derive(Debug, Deserialize)]
pub struct ConnectionRequest {
    pub endpoint: String,
    pub email: String,
    pub password: String,
    /// Public address Home Assistant should use; unchanged when omitted
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub secure: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionTestResponse {
    pub valid: bool,
}

/// POST /api/v1/test-connection - Try a credential without storing it
pub async fn test_connection(
    State(state): State<GatewayState>,
    Json(req): Json<ConnectionRequest>,
) -> Json<ConnectionTestResponse> {
    let valid = match Credential::parse(&req.endpoint, &req.email, &req.password) {
        Ok(candidate) => state.sessions.test_credential(&candidate).await,
        Err(e) => {
            tracing::warn!("Connection test rejected endpoint '{}': {}", req.endpoint, e);
            false
        }
    };

    Json(ConnectionTestResponse { valid })
}

/// POST /api/v1/save-connection - Persist the credential and log in again
///
/// Answers before the new login completes; its outcome only shows up in the
/// log and in `GET /api/v1/status`.
pub async fn save_connection(
    State(state): State<GatewayState>,
    Json(req): Json<ConnectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let credential = Credential::parse(&req.endpoint, &req.email, &req.password)
        .map_err(|e| AppError::BadRequest(format!("Invalid endpoint: {}", e)))?;

    let settings = ConnectionSettings {
        endpoint: credential.endpoint.to_string(),
        email: req.email,
        password: req.password,
        host: req.host,
        port: req.port,
        secure: req.secure,
    };

    if let Err(e) = state.connection_store.save(&settings).await {
        tracing::error!(
            "Failed to persist connection settings to {}: {}",
            state.connection_store.path().display(),
            e
        );
    }

    {
        let mut public = state.public_address.write().await;
        if let Some(host) = settings.host {
            public.host = host;
        }
        if let Some(port) = settings.port {
            public.port = port;
        }
        if let Some(secure) = settings.secure {
            public.secure = secure;
        }
    }

    // Fire and forget
    drop(state.sessions.configure(credential).await);

    Ok(Json(SuccessResponse::new("Connection saved")))
}

/// GET /api/v1/status - Session state, without secrets
pub async fn get_status(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(state.sessions.status().await)
}

/// POST /api/v1/reauthenticate - Drop the session and log in again
pub async fn reauthenticate(State(state): State<GatewayState>) -> StatusCode {
    drop(state.sessions.reauthenticate().await);
    StatusCode::ACCEPTED
}
