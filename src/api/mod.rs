//! REST API client module for the CloudAlbum user service.
//!
//! This module provides the `ApiClient` for communicating with the
//! CloudAlbum backend to enroll users and sign them in and out.
//!
//! The API uses JWT bearer token authentication obtained through
//! the `/users/signin` endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
