//! Tiko API client
//!
//! One HTTP exchange per call: no retries, no pooling tweaks, no timeout
//! beyond what reqwest applies by default.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::queries;
use crate::models::Credential;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("vendor returned {0}")]
    Status(StatusCode),

    #[error("GraphQL errors: {0}")]
    Graphql(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A GraphQL document together with its variables
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    #[serde(rename = "operationName")]
    pub name: &'static str,
    pub query: &'static str,
    pub variables: Value,
}

/// What a successful login hands back
#[derive(Debug, Clone, PartialEq)]
pub struct LoginGrant {
    pub token: String,
    pub account_id: i64,
}

/// Vendor-facing seam used by the session manager and the domain operations
#[async_trait]
pub trait TikoApi: Send + Sync {
    /// Unauthenticated login exchange
    async fn login(&self, credential: &Credential) -> Result<LoginGrant, ClientError>;

    /// Authenticated GraphQL query/mutation; returns the `data` member
    async fn send(
        &self,
        endpoint: &Url,
        operation: &Operation,
        token: &str,
    ) -> Result<Value, ClientError>;

    /// Authenticated plain GET of a REST resource below the endpoint
    async fn fetch(&self, endpoint: &Url, path: &str, token: &str) -> Result<Value, ClientError>;
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

impl GraphqlResponse {
    fn into_data(self) -> Result<Value, ClientError> {
        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(ClientError::Graphql(messages.join("; ")));
        }

        match self.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(ClientError::Malformed("missing data".to_string())),
        }
    }
}

/// Extract token and property id from the `logIn` payload
fn parse_login(data: &Value) -> Result<LoginGrant, ClientError> {
    let token = data
        .pointer("/logIn/token")
        .and_then(|v| v.as_str())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ClientError::Malformed("no token in login response".to_string()))?;

    let property_id = data
        .pointer("/logIn/user/properties/0/id")
        .ok_or_else(|| ClientError::Malformed("no property in login response".to_string()))?;

    // GraphQL IDs may arrive as strings
    let account_id = property_id
        .as_i64()
        .or_else(|| property_id.as_str().and_then(|s| s.parse().ok()))
        .ok_or_else(|| {
            ClientError::Malformed(format!("unexpected property id: {}", property_id))
        })?;

    Ok(LoginGrant {
        token: token.to_string(),
        account_id,
    })
}

fn join_endpoint(endpoint: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn graphql_url(endpoint: &Url) -> String {
    join_endpoint(endpoint, "api/v3/graphql/")
}

fn auth_header(token: &str) -> String {
    format!("token {}", token)
}

/// reqwest-backed implementation talking to the real vendor
pub struct TikoClient {
    http_client: Client,
}

impl TikoClient {
    pub fn new() -> Result<Self, ClientError> {
        let http_client = Client::builder().build()?;
        Ok(Self { http_client })
    }

    async fn post_graphql(
        &self,
        endpoint: &Url,
        operation: &Operation,
        token: Option<&str>,
    ) -> Result<Value, ClientError> {
        let mut request = self.http_client.post(graphql_url(endpoint)).json(operation);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, auth_header(token));
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let body: GraphqlResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Malformed(e.to_string()))?;

        body.into_data()
    }
}

#[async_trait]
impl TikoApi for TikoClient {
    async fn login(&self, credential: &Credential) -> Result<LoginGrant, ClientError> {
        let operation = queries::log_in(&credential.email, &credential.password);
        let data = self
            .post_graphql(&credential.endpoint, &operation, None)
            .await?;
        parse_login(&data)
    }

    async fn send(
        &self,
        endpoint: &Url,
        operation: &Operation,
        token: &str,
    ) -> Result<Value, ClientError> {
        tracing::debug!("[Tiko] {} -> {}", operation.name, endpoint);
        self.post_graphql(endpoint, operation, Some(token)).await
    }

    async fn fetch(&self, endpoint: &Url, path: &str, token: &str) -> Result<Value, ClientError> {
        let url = join_endpoint(endpoint, path);
        tracing::debug!("[Tiko] GET {}", url);

        let resp = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, auth_header(token))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        resp.json()
            .await
            .map_err(|e| ClientError::Malformed(e.to_string()))
    }
}
