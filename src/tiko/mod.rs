//! Tiko API integration module
//!
//! - `client`: Low-level API client (login, GraphQL, REST reads)
//! - `queries`: GraphQL documents and variables
//! - `session`: Credential/token lifecycle
//! - `operations`: Heating operations built on the session

pub mod client;
pub mod operations;
pub mod queries;
pub mod session;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{TikoApi, TikoClient};
pub use operations::HeatingOperations;
pub use session::SessionManager;
