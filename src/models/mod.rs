//! Data models for the Tiko gateway

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

// ============================================================================
// Credential / Session
// ============================================================================

/// Vendor account credential (endpoint, identity, secret)
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub endpoint: Url,
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn new(endpoint: Url, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            endpoint,
            email: email.into(),
            password: password.into(),
        }
    }

    /// Parse a credential from raw form input
    pub fn parse(endpoint: &str, email: &str, password: &str) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(endpoint.trim())?;
        Ok(Self::new(endpoint, email, password))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("endpoint", &self.endpoint.as_str())
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// Authenticated vendor session
#[derive(Clone, PartialEq)]
pub struct Session {
    pub token: String,
    /// Property id of the account; the vendor calls it `propertyId`
    pub account_id: i64,
    /// Endpoint the token was issued by
    pub endpoint: Url,
    pub authenticated_at: DateTime<Utc>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"********")
            .field("account_id", &self.account_id)
            .field("endpoint", &self.endpoint.as_str())
            .field("authenticated_at", &self.authenticated_at)
            .finish()
    }
}

/// Session lifecycle as reported by `GET /api/v1/status`
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub state: &'static str,
    pub configured: bool,
    pub endpoint: Option<String>,
    pub account_id: Option<i64>,
    pub authenticated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Property overview (vendor payload)
// ============================================================================

/// `data` member of the overview query response
#[derive(Debug, Clone, Deserialize)]
pub struct Overview {
    pub property: Property,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub mode: Option<Map<String, Value>>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Property {
    /// Mode flags in vendor order (empty when the vendor reports none)
    pub fn modes(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.mode.iter().flat_map(|m| m.iter())
    }
}

/// Room readings are kept as raw JSON numbers so they are echoed back unmodified
#[derive(Debug, Clone, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    #[serde(rename = "currentTemperatureDegrees", default)]
    pub current_temperature: Value,
    #[serde(rename = "targetTemperatureDegrees", default)]
    pub target_temperature: Value,
    #[serde(default)]
    pub humidity: Value,
    #[serde(default)]
    pub status: Option<RoomStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomStatus {
    #[serde(rename = "heatingOperating", default)]
    pub heating_operating: Option<bool>,
}

impl Room {
    pub fn slug(&self) -> String {
        room_slug(&self.name)
    }

    pub fn heating_active(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.heating_operating)
            .unwrap_or(false)
    }
}

/// Normalize a room name into a stable key: "Living Room" -> "living-room"
pub fn room_slug(name: &str) -> String {
    name.split(' ').collect::<Vec<_>>().join("-").to_lowercase()
}

// ============================================================================
// Public service address
// ============================================================================

/// Address Home Assistant uses to reach this gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAddress {
    pub secure: bool,
    pub host: String,
    pub port: u16,
}

impl PublicAddress {
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}
