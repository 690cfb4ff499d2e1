//! Recording stand-in for the Tiko API used by unit tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::Notify;
use url::Url;

use super::client::{ClientError, LoginGrant, Operation, TikoApi};
use crate::models::Credential;

pub const ENDPOINT: &str = "https://portal-engie.tiko.ch";

pub fn credential(password: &str) -> Credential {
    Credential::parse(ENDPOINT, "me@example.com", password).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    Login(String),
    Send {
        name: &'static str,
        variables: Value,
        token: String,
    },
    Fetch {
        path: String,
        token: String,
    },
}

pub struct FakeTiko {
    valid_password: String,
    logins: AtomicUsize,
    failing: AtomicBool,
    overview: Mutex<Value>,
    calls: Mutex<Vec<FakeCall>>,
    held: Mutex<Option<(String, Arc<Notify>)>>,
}

impl FakeTiko {
    pub const ACCOUNT_ID: i64 = 4242;

    pub fn new(valid_password: &str) -> Self {
        Self {
            valid_password: valid_password.to_string(),
            logins: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            overview: Mutex::new(sample_overview()),
            calls: Mutex::new(Vec::new()),
            held: Mutex::new(None),
        }
    }

    pub fn set_overview(&self, overview: Value) {
        *self.overview.lock().unwrap() = overview;
    }

    /// Logins with `password` stay open until the returned gate is notified
    pub fn hold_logins_with(&self, password: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.held.lock().unwrap() = Some((password.to_string(), gate.clone()));
        gate
    }

    /// Make every authenticated call fail with an HTTP error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn login_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, FakeCall::Login(_)))
            .count()
    }

    /// Authenticated calls (everything except logins)
    pub fn vendor_call_count(&self) -> usize {
        self.calls().len() - self.login_count()
    }

    fn record(&self, call: FakeCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TikoApi for FakeTiko {
    async fn login(&self, credential: &Credential) -> Result<LoginGrant, ClientError> {
        self.record(FakeCall::Login(credential.email.clone()));

        let gate = self
            .held
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(password, _)| *password == credential.password)
            .map(|(_, gate)| gate.clone());
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if credential.password != self.valid_password {
            return Err(ClientError::Graphql("Invalid credentials".to_string()));
        }

        let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(LoginGrant {
            token: format!("token-{}", n),
            account_id: Self::ACCOUNT_ID,
        })
    }

    async fn send(
        &self,
        _endpoint: &Url,
        operation: &Operation,
        token: &str,
    ) -> Result<Value, ClientError> {
        self.record(FakeCall::Send {
            name: operation.name,
            variables: operation.variables.clone(),
            token: token.to_string(),
        });

        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR));
        }

        match operation.name {
            "GET_PROPERTY_OVERVIEW_DECENTRALISED" => Ok(self.overview.lock().unwrap().clone()),
            "SET_PROPERTY_MODE" => Ok(json!({
                "setPropertyMode": { "id": Self::ACCOUNT_ID, "mode": operation.variables["mode"] }
            })),
            _ => Ok(json!({ "ok": true })),
        }
    }

    async fn fetch(&self, _endpoint: &Url, path: &str, token: &str) -> Result<Value, ClientError> {
        self.record(FakeCall::Fetch {
            path: path.to_string(),
            token: token.to_string(),
        });

        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Status(StatusCode::BAD_GATEWAY));
        }

        Ok(json!({
            "response": {
                "today_total_wh": 5120,
                "yesterday_total_same_time_wh": 4870,
                "this_month_total_wh": 80300
            }
        }))
    }
}

pub fn sample_overview() -> Value {
    json!({
        "settings": { "benchmark": { "isEnabled": false } },
        "property": {
            "id": FakeTiko::ACCOUNT_ID,
            "mode": { "boost": false },
            "address": { "city": "Lausanne", "zipCode": "1003" },
            "devices": [],
            "rooms": [{
                "id": 1,
                "name": "Living Room",
                "currentTemperatureDegrees": 21.5,
                "targetTemperatureDegrees": 22,
                "humidity": 45,
                "status": { "heatingOperating": true }
            }]
        }
    })
}
