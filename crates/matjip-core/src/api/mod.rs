//! REST client for the matjip backend.
//!
//! This module provides the `RequestClient`, which attaches the member's
//! identity and bearer token to every call and recovers from an expired
//! access token with a single coordinated refresh.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod refresh;

pub use client::{RequestClient, SessionExpiredHook, MEMBER_ID_HEADER};
pub use error::RequestError;
pub use refresh::{RefreshOutcome, RefreshReport, TokenRefresher};
