//! Heating operations: one vendor call each, gated on the current session

use std::sync::Arc;

use serde_json::Value;

use super::client::{ClientError, Operation};
use super::queries;
use super::session::SessionManager;
use crate::error::GatewayError;
use crate::models::{Overview, Session};

fn upstream(e: ClientError) -> GatewayError {
    GatewayError::UpstreamFailure(e.to_string())
}

/// Translates gateway requests into Tiko queries and mutations.
///
/// Holds no state of its own; failures are handed back as-is, with no retry
/// and no session invalidation.
#[derive(Clone)]
pub struct HeatingOperations {
    sessions: Arc<SessionManager>,
}

impl HeatingOperations {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }

    async fn run(&self, session: &Session, operation: Operation) -> Result<Value, GatewayError> {
        self.sessions
            .api()
            .send(&session.endpoint, &operation, &session.token)
            .await
            .map_err(upstream)
    }

    /// Full property snapshot (rooms and modes), as returned by the vendor
    pub async fn fetch_overview(&self) -> Result<Value, GatewayError> {
        let session = self.sessions.current_session().await?;
        self.run(&session, queries::property_overview(session.account_id))
            .await
    }

    /// `fetch_overview`, decoded for reshaping
    pub async fn property_overview(&self) -> Result<Overview, GatewayError> {
        let data = self.fetch_overview().await?;
        serde_json::from_value(data)
            .map_err(|e| GatewayError::UpstreamFailure(format!("unexpected overview: {}", e)))
    }

    pub async fn set_mode(&self, mode: &str) -> Result<(), GatewayError> {
        let session = self.sessions.current_session().await?;
        tracing::debug!("Setting mode to {}", mode);

        self.run(&session, queries::set_property_mode(session.account_id, mode))
            .await?;
        Ok(())
    }

    pub async fn set_room_temperature(
        &self,
        room_id: i64,
        temperature: f64,
    ) -> Result<(), GatewayError> {
        let session = self.sessions.current_session().await?;
        tracing::debug!("Setting temperature of room {} to {}", room_id, temperature);

        self.run(
            &session,
            queries::set_room_temperature(session.account_id, room_id, temperature),
        )
        .await?;
        Ok(())
    }

    /// Consumption summary; the vendor wraps it in a `response` member
    pub async fn fetch_consumption(&self) -> Result<Value, GatewayError> {
        let session = self.sessions.current_session().await?;
        let path = queries::consumption_path(session.account_id);

        let mut body = self
            .sessions
            .api()
            .fetch(&session.endpoint, &path, &session.token)
            .await
            .map_err(upstream)?;

        Ok(match body.get_mut("response") {
            Some(inner) => inner.take(),
            None => body,
        })
    }
}
