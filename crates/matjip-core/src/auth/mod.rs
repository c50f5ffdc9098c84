//! Authentication state for the current member.
//!
//! This module provides:
//! - `Session`: the member id, token pair and display fields
//! - `SessionStore`: the storage seam the request client reads from
//! - `MemorySessionStore` / `FileSessionStore`: in-memory and on-disk stores
//! - `CredentialStore`: remembered passwords in the OS keychain

pub mod credentials;
pub mod file_store;
pub mod session;

pub use credentials::CredentialStore;
pub use file_store::FileSessionStore;
pub use session::{MemorySessionStore, Session, SessionStore};
