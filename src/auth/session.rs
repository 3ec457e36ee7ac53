use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Tokens and identity for a signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub access_token: String,
    pub refresh_token: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Shared handle to the current session.
///
/// Clone is cheap - every clone observes the same sign-in state. The
/// handle is injected into `ApiClient` at construction, so there is no
/// process-wide singleton; tests and applications own their sessions.
///
/// Both tokens are always installed by a single `update` call. Readers
/// never observe an access token from one sign-in paired with a refresh
/// token from another.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<SessionData>>>,
}

impl Session {
    /// Create an empty, unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session with new sign-in data.
    pub async fn update(&self, data: SessionData) {
        *self.inner.write().await = Some(data);
    }

    /// Clear the session, returning to the unauthenticated state.
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// Get the bearer token, if signed in.
    pub async fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|d| d.access_token.clone())
    }

    /// Get the refresh token, if signed in.
    pub async fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|d| d.refresh_token.clone())
    }

    /// Check whether a sign-in is currently stored.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Get a snapshot of the full session data.
    pub async fn data(&self) -> Option<SessionData> {
        self.inner.read().await.clone()
    }
}
