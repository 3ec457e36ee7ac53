//! CloudAlbum client - authentication and session handling for the
//! CloudAlbum user API.
//!
//! This crate provides:
//! - `ApiClient`: HTTP client for the backend's `/users` endpoints
//! - `Session`: injectable in-memory token store shared with the client
//! - `Config`: API endpoint and timeout configuration
//!
//! Signing in stores the issued token pair in the session, and every
//! request issued through the same client afterwards carries the matching
//! `Authorization: Bearer` header. The session handle is cloneable, so
//! the application decides who else observes the stored tokens.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{Session, SessionData};
pub use config::Config;
pub use models::{ApiMessage, Credentials, SignUpRequest, TokenPair};
