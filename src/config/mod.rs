//! Configuration module

mod connection;

pub use self::connection::{ConnectionSettings, ConnectionStore};

use serde::Deserialize;

use crate::models::{Credential, PublicAddress};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tiko: TikoConfig,
    #[serde(default)]
    pub public: PublicConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for unmatched paths (setup pages)
    #[serde(default)]
    pub static_dir: Option<String>,
    #[serde(default = "default_connection_file")]
    pub connection_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            connection_file: default_connection_file(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TikoConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for TikoConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            email: None,
            password: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PublicConfig {
    #[serde(default)]
    pub secure: bool,
    #[serde(default = "default_public_host")]
    pub host: String,
    /// Falls back to `server.port`
    #[serde(default)]
    pub port: Option<u16>,
}

impl Default for PublicConfig {
    fn default() -> Self {
        Self {
            secure: false,
            host: default_public_host(),
            port: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_connection_file() -> String {
    "config/connection.json".to_string()
}

fn default_endpoint() -> String {
    "https://portal-engie.tiko.ch".to_string()
}

fn default_public_host() -> String {
    "localhost".to_string()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("HASS_TIKO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// Persisted connection settings take precedence over file/env values
    pub fn apply_connection(&mut self, saved: &ConnectionSettings) {
        self.tiko.endpoint = saved.endpoint.clone();
        self.tiko.email = Some(saved.email.clone());
        self.tiko.password = Some(saved.password.clone());
        if let Some(host) = &saved.host {
            self.public.host = host.clone();
        }
        if let Some(port) = saved.port {
            self.public.port = Some(port);
        }
        if let Some(secure) = saved.secure {
            self.public.secure = secure;
        }
    }

    /// Credential to authenticate with at boot, if one is configured
    pub fn credential(&self) -> anyhow::Result<Option<Credential>> {
        let (email, password) = match (&self.tiko.email, &self.tiko.password) {
            (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
            _ => return Ok(None),
        };

        let credential = Credential::parse(&self.tiko.endpoint, email, password)
            .map_err(|e| anyhow::anyhow!("Invalid Tiko endpoint '{}': {}", self.tiko.endpoint, e))?;
        Ok(Some(credential))
    }

    pub fn public_address(&self) -> PublicAddress {
        PublicAddress {
            secure: self.public.secure,
            host: self.public.host.clone(),
            port: self.public.port.unwrap_or(self.server.port),
        }
    }
}
