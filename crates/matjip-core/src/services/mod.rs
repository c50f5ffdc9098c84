//! Typed calls to the matjip backend.
//!
//! Each submodule adds methods to `RequestClient` for one area of the API.
//! The methods hold no state of their own: they build the path, encode the
//! body and decode the response. Session writes happen only on login,
//! logout, profile updates and account deletion.

pub mod auth;
pub mod comments;
pub mod likes;
pub mod members;
pub mod posts;
