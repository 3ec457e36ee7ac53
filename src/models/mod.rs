//! Data models for the CloudAlbum user API.
//!
//! Wire types exchanged with the backend:
//!
//! - `Credentials`, `SignUpRequest`: request bodies
//! - `TokenPair`: successful sign-in payload
//! - `ApiMessage`: the backend's `{ok, Message}` envelope

pub mod auth;

pub use auth::{ApiMessage, Credentials, SignUpRequest, TokenPair};
