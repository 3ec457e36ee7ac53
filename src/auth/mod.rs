//! Authentication module for managing the user session.
//!
//! This module provides `Session`, a cloneable in-memory token store
//! shared between the application and the API client. The session is
//! created empty, populated by a successful sign-in, and cleared by
//! sign-out. Tokens live only for the lifetime of the process.

pub mod session;

pub use session::{Session, SessionData};
