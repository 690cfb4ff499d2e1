//! Shared gateway state handed to every handler

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ConnectionStore;
use crate::models::{Credential, PublicAddress};
use crate::tiko::{HeatingOperations, SessionManager, TikoApi};

#[derive(Clone)]
pub struct GatewayState {
    pub sessions: Arc<SessionManager>,
    pub operations: HeatingOperations,
    pub connection_store: Arc<ConnectionStore>,
    /// Where Home Assistant reaches us; baked into the generated YAML
    pub public_address: Arc<RwLock<PublicAddress>>,
}

impl GatewayState {
    pub fn new(
        api: Arc<dyn TikoApi>,
        credential: Option<Credential>,
        connection_store: ConnectionStore,
        public_address: PublicAddress,
    ) -> Self {
        let sessions = Arc::new(SessionManager::new(api, credential));
        let operations = HeatingOperations::new(sessions.clone());

        Self {
            sessions,
            operations,
            connection_store: Arc::new(connection_store),
            public_address: Arc::new(RwLock::new(public_address)),
        }
    }
}
