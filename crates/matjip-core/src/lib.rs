//! Core library for the matjip restaurant review client.
//!
//! - `auth`: the persisted member session and OS keychain credentials
//! - `api`: the request client with coordinated token refresh
//! - `services`: typed wrappers for the backend's REST endpoints
//! - `models`: request and response bodies
//! - `config`: client configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod services;

pub use api::{RequestClient, RequestError, TokenRefresher};
pub use auth::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use config::ClientConfig;
