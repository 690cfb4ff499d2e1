//! hass-tiko-gateway - Tiko heating API bridge for Home Assistant
//!
//! Logs into the Tiko GraphQL API once, keeps the session token, and serves
//! a small REST surface (readings, mode/temperature commands, generated
//! Home Assistant configuration).

mod api;
mod config;
mod error;
mod hass;
mod models;
mod state;
mod tiko;

use std::net::SocketAddr;
use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ConnectionStore;
use crate::state::GatewayState;
use crate::tiko::TikoClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hass_tiko_gateway=info,tower_http=debug".into()),
        )
        .init();

    tracing::info!("Starting hass-tiko-gateway...");

    // Load configuration, then let saved connection settings override it
    let mut config = config::Config::load()?;
    let connection_store = ConnectionStore::new(&config.server.connection_file);
    match connection_store.load().await {
        Ok(Some(saved)) => {
            config.apply_connection(&saved);
            tracing::info!(
                "Loaded connection settings from {}",
                connection_store.path().display()
            );
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(
            "Ignoring unreadable connection settings {}: {}",
            connection_store.path().display(),
            e
        ),
    }
    tracing::info!("Configuration loaded");

    let api = Arc::new(TikoClient::new()?);
    let state = GatewayState::new(
        api,
        config.credential()?,
        connection_store,
        config.public_address(),
    );

    boot_authenticate(&state).await?;

    // Build application router
    let cors = CorsLayer::permissive();

    let mut app = api::routes().with_state(state);
    if let Some(dir) = &config.server.static_dir {
        tracing::info!("Serving setup pages from {}", dir);
        app = app.fallback_service(ServeDir::new(dir));
    }

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initial login. A configured credential that fails is fatal; without one
/// the gateway keeps serving so the setup pages can supply it.
async fn boot_authenticate(state: &GatewayState) -> anyhow::Result<()> {
    if !state.sessions.is_configured().await {
        tracing::warn!("No Tiko credential configured; waiting for /api/v1/save-connection");
        return Ok(());
    }

    if let Err(e) = state.sessions.authenticate().await {
        tracing::error!("Startup authentication failed, exiting: {}", e);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublicAddress;
    use crate::tiko::fake::{credential, FakeTiko};
    use crate::tiko::session::SessionState;
    use tokio_test::{assert_err, assert_ok};

    fn state(
        fake: &Arc<FakeTiko>,
        password: Option<&str>,
        dir: &tempfile::TempDir,
    ) -> GatewayState {
        GatewayState::new(
            fake.clone(),
            password.map(credential),
            ConnectionStore::new(dir.path().join("connection.json")),
            PublicAddress {
                secure: false,
                host: "localhost".to_string(),
                port: 8080,
            },
        )
    }

    #[tokio::test]
    async fn test_boot_without_credential_keeps_serving() {
        let dir = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeTiko::new("good"));
        let state = state(&fake, None, &dir);

        assert_ok!(boot_authenticate(&state).await);
        assert_eq!(fake.login_count(), 0);
        assert_eq!(state.sessions.state().await, SessionState::Unconfigured);
    }

    #[tokio::test]
    async fn test_boot_with_bad_credential_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeTiko::new("good"));
        let state = state(&fake, Some("wrong"), &dir);

        assert_err!(boot_authenticate(&state).await);
        assert_eq!(fake.login_count(), 1);
    }

    #[tokio::test]
    async fn test_boot_with_good_credential_authenticates() {
        let dir = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeTiko::new("good"));
        let state = state(&fake, Some("good"), &dir);

        assert_ok!(boot_authenticate(&state).await);
        assert!(state.sessions.current_session().await.is_ok());
    }
}
