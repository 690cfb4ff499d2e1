//! SessionManager: the single vendor credential and the token derived from it
//!
//! State moves Unconfigured -> Authenticating -> Authenticated. A failed
//! login falls back to Unconfigured. Nothing leaves Authenticated on its own:
//! an expired token is only noticed when a vendor call fails, and that failure
//! is not turned into a re-login.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::client::TikoApi;
use crate::error::GatewayError;
use crate::models::{Credential, Session, SessionStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unconfigured,
    Authenticating,
    Authenticated(Session),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unconfigured => "unconfigured",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}

/// Sole owner and writer of the process-wide credential and session.
///
/// Concurrent `authenticate()` calls are not serialized: whichever successful
/// login finishes last overwrites the session, and in-flight callers may see
/// their session replaced.
pub struct SessionManager {
    api: Arc<dyn TikoApi>,
    credential: RwLock<Option<Credential>>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn TikoApi>, credential: Option<Credential>) -> Self {
        Self {
            api,
            credential: RwLock::new(credential),
            state: RwLock::new(SessionState::Unconfigured),
        }
    }

    pub(crate) fn api(&self) -> &Arc<dyn TikoApi> {
        &self.api
    }

    /// Replace the credential, drop the current session and log in again in
    /// the background. The outcome is only logged; the handle is returned for
    /// callers that want to wait on it.
    pub async fn configure(
        self: &Arc<Self>,
        credential: Credential,
    ) -> JoinHandle<Result<Session, GatewayError>> {
        tracing::info!(
            "[Session] Credential replaced ({} at {})",
            credential.email,
            credential.endpoint
        );

        *self.credential.write().await = Some(credential);
        *self.state.write().await = SessionState::Authenticating;

        self.spawn_authenticate()
    }

    /// Clear the session and log in again with the stored credential
    pub async fn reauthenticate(self: &Arc<Self>) -> JoinHandle<Result<Session, GatewayError>> {
        self.invalidate().await;
        self.spawn_authenticate()
    }

    fn spawn_authenticate(self: &Arc<Self>) -> JoinHandle<Result<Session, GatewayError>> {
        let manager = Arc::clone(self);
        tokio::spawn(async move { manager.authenticate().await })
    }

    /// Log in with the stored credential and keep the resulting session
    pub async fn authenticate(&self) -> Result<Session, GatewayError> {
        let credential = self.credential.read().await.clone();
        let Some(credential) = credential else {
            *self.state.write().await = SessionState::Unconfigured;
            tracing::warn!("[Session] Cannot authenticate: no credential configured");
            return Err(GatewayError::AuthenticationFailed(
                "no credential configured".to_string(),
            ));
        };

        *self.state.write().await = SessionState::Authenticating;

        match self.api.login(&credential).await {
            Ok(grant) => {
                let session = Session {
                    token: grant.token,
                    account_id: grant.account_id,
                    endpoint: credential.endpoint.clone(),
                    authenticated_at: Utc::now(),
                };
                *self.state.write().await = SessionState::Authenticated(session.clone());

                tracing::info!(
                    "[Session] Authenticated as {} (property {})",
                    credential.email,
                    session.account_id
                );
                Ok(session)
            }
            Err(e) => {
                tracing::error!(
                    "[Session] Authentication against {} failed: {}",
                    credential.endpoint,
                    e
                );

                // A concurrent login may have succeeded meanwhile; keep its session.
                let mut state = self.state.write().await;
                if *state == SessionState::Authenticating {
                    *state = SessionState::Unconfigured;
                }
                Err(GatewayError::AuthenticationFailed(e.to_string()))
            }
        }
    }

    /// Stored session, or `NoSession`. Never logs in.
    pub async fn current_session(&self) -> Result<Session, GatewayError> {
        match &*self.state.read().await {
            SessionState::Authenticated(session) => Ok(session.clone()),
            _ => Err(GatewayError::NoSession),
        }
    }

    /// Try a candidate credential without touching stored state
    pub async fn test_credential(&self, candidate: &Credential) -> bool {
        match self.api.login(candidate).await {
            Ok(_) => {
                tracing::info!("[Session] Credential test for {} succeeded", candidate.email);
                true
            }
            Err(e) => {
                tracing::warn!(
                    "[Session] Credential test for {} failed: {}",
                    candidate.email,
                    e
                );
                false
            }
        }
    }

    pub async fn invalidate(&self) {
        *self.state.write().await = SessionState::Unconfigured;
        tracing::info!("[Session] Session invalidated");
    }

    pub async fn is_configured(&self) -> bool {
        self.credential.read().await.is_some()
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn status(&self) -> SessionStatus {
        let endpoint = self
            .credential
            .read()
            .await
            .as_ref()
            .map(|c| c.endpoint.to_string());
        let state = self.state().await;
        let session = match &state {
            SessionState::Authenticated(s) => Some(s),
            _ => None,
        };

        SessionStatus {
            state: state.name(),
            configured: endpoint.is_some(),
            endpoint,
            account_id: session.map(|s| s.account_id),
            authenticated_at: session.map(|s| s.authenticated_at),
        }
    }
}
