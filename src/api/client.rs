//! API client for communicating with the CloudAlbum user service.
//!
//! This module provides the `ApiClient` struct for enrolling users and
//! signing them in and out against the backend's `/users` endpoints.
//! A successful sign-in installs the issued token pair in the shared
//! `Session`, and every later request made through the same client
//! carries the matching `Authorization: Bearer` header.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::auth::{Session, SessionData};
use crate::config::Config;
use crate::models::{ApiMessage, Credentials, SignUpRequest, TokenPair};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Content type sent with JSON request bodies.
/// The backend expects the explicit charset suffix.
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// API client for the CloudAlbum backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the session handle is shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a new API client against the configured endpoint.
    ///
    /// The session handle is injected rather than owned, so the caller
    /// decides who else observes the stored tokens.
    pub fn new(config: &Config, session: Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// The session this client stores tokens into.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send the sign-in request and return the issued token pair.
    ///
    /// This is the bare HTTP call: nothing is stored. Transport failures
    /// and non-2xx statuses propagate to the caller unmodified.
    pub async fn request_sign_in(&self, email: &str, password: &str) -> Result<TokenPair> {
        let url = format!("{}/users/signin", self.base_url);
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(&body)
            .send()
            .await
            .context("Failed to send sign-in request")?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .context("Failed to parse sign-in response")
    }

    /// Sign in and store the issued tokens in the session.
    ///
    /// On success both tokens are installed together, so the stored
    /// access token and the bearer header derived from it can never
    /// disagree. On failure the session is left untouched: a previously
    /// stored sign-in stays valid.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenPair> {
        let tokens = self.request_sign_in(email, password).await?;

        self.session
            .update(SessionData {
                access_token: tokens.access_token.clone(),
                refresh_token: tokens.refresh_token.clone(),
                email: email.to_string(),
                signed_in_at: Utc::now(),
            })
            .await;

        debug!(email, "Signed in");
        Ok(tokens)
    }

    /// Enroll a new user.
    ///
    /// The backend answers 409 for an already-registered email, which
    /// maps to `ApiError::AlreadyRegistered`.
    pub async fn sign_up(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<ApiMessage> {
        let url = format!("{}/users/signup", self.base_url);
        let body = SignUpRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(&body)
            .send()
            .await
            .context("Failed to send sign-up request")?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .context("Failed to parse sign-up response")
    }

    /// Sign out and clear the stored session.
    ///
    /// Requires an authenticated session; the backend invalidates the
    /// access token, and the session is cleared only after the server
    /// confirms.
    pub async fn sign_out(&self) -> Result<()> {
        if !self.session.is_authenticated().await {
            return Err(ApiError::Unauthorized.into());
        }

        let url = format!("{}/users/signout", self.base_url);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers().await?)
            .send()
            .await
            .context("Failed to send sign-out request")?;

        Self::check_response(response).await?;

        self.session.clear().await;
        debug!("Signed out");
        Ok(())
    }

    /// Health check against the user service.
    pub async fn ping(&self) -> Result<ApiMessage> {
        let url = format!("{}/users/ping", self.base_url);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers().await?)
            .send()
            .await
            .context("Failed to send ping request")?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .context("Failed to parse ping response")
    }

    /// Build the auth headers for an outgoing request.
    ///
    /// The bearer header is derived from the session at request-issue
    /// time, never cached, so it always matches the stored access token.
    async fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.session.access_token().await {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Request failed");
            Err(ApiError::from_status(status, &body).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::MockServer;
    use serde_json::json;

    fn test_client(server: &MockServer) -> ApiClient {
        let config = Config {
            api_endpoint: server.base_url(),
            timeout_secs: 5,
        };
        ApiClient::new(&config, Session::new()).expect("build test client")
    }

    #[tokio::test]
    async fn test_sign_in_sends_exact_body_and_content_type() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/users/signin")
                .header("content-type", "application/json; charset=utf-8")
                .json_body(json!({"email": "user@example.com", "password": "hunter2"}));
            then.status(200)
                .json_body(json!({"accessToken": "A", "refreshToken": "R"}));
        });

        let client = test_client(&server);
        let tokens = client
            .request_sign_in("user@example.com", "hunter2")
            .await
            .expect("sign-in request");

        mock.assert();
        assert_eq!(tokens.access_token, "A");
        assert_eq!(tokens.refresh_token, "R");
        // The bare request stores nothing
        assert!(!client.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_sign_in_stores_tokens_and_bearer_header() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/users/signin");
            then.status(200)
                .json_body(json!({"accessToken": "A", "refreshToken": "R"}));
        });
        let ping = server.mock(|when, then| {
            when.method(GET)
                .path("/users/ping")
                .header("authorization", "Bearer A");
            then.status(200).json_body(json!({"ok": true, "Message": "pong"}));
        });

        let client = test_client(&server);
        client
            .sign_in("user@example.com", "hunter2")
            .await
            .expect("sign in");

        assert_eq!(client.session().access_token().await.as_deref(), Some("A"));
        assert_eq!(client.session().refresh_token().await.as_deref(), Some("R"));

        let msg = client.ping().await.expect("ping");
        ping.assert();
        assert!(msg.ok);
        assert_eq!(msg.message.as_deref(), Some("pong"));
    }

    #[tokio::test]
    async fn test_sign_in_failure_propagates_and_stores_nothing() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/users/signin");
            then.status(400).body("Password is mismatched or invalid user");
        });

        let client = test_client(&server);
        let err = client
            .sign_in("user@example.com", "wrong")
            .await
            .expect_err("sign-in should fail");

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::BadRequest(_))
        ));
        assert!(!client.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_previous_session() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/users/signin")
                .json_body(json!({"email": "first@example.com", "password": "pw1"}));
            then.status(200)
                .json_body(json!({"accessToken": "A1", "refreshToken": "R1"}));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/users/signin")
                .json_body(json!({"email": "second@example.com", "password": "pw2"}));
            then.status(400).body("User does not exist");
        });

        let client = test_client(&server);
        client
            .sign_in("first@example.com", "pw1")
            .await
            .expect("first sign in");
        client
            .sign_in("second@example.com", "pw2")
            .await
            .expect_err("second sign-in should fail");

        // The earlier session stays installed
        assert_eq!(client.session().access_token().await.as_deref(), Some("A1"));
        assert_eq!(client.session().refresh_token().await.as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn test_second_sign_in_replaces_tokens() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/users/signin")
                .json_body(json!({"email": "first@example.com", "password": "pw1"}));
            then.status(200)
                .json_body(json!({"accessToken": "A1", "refreshToken": "R1"}));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/users/signin")
                .json_body(json!({"email": "second@example.com", "password": "pw2"}));
            then.status(200)
                .json_body(json!({"accessToken": "A2", "refreshToken": "R2"}));
        });
        let ping = server.mock(|when, then| {
            when.method(GET)
                .path("/users/ping")
                .header("authorization", "Bearer A2");
            then.status(200).json_body(json!({"ok": true, "Message": "pong"}));
        });

        let client = test_client(&server);
        client
            .sign_in("first@example.com", "pw1")
            .await
            .expect("first sign in");
        client
            .sign_in("second@example.com", "pw2")
            .await
            .expect("second sign in");

        assert_eq!(client.session().access_token().await.as_deref(), Some("A2"));
        assert_eq!(client.session().refresh_token().await.as_deref(), Some("R2"));

        client.ping().await.expect("ping");
        ping.assert();
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/users/signin");
            then.status(200)
                .json_body(json!({"accessToken": "A", "refreshToken": "R"}));
        });
        let signout = server.mock(|when, then| {
            when.method(POST)
                .path("/users/signout")
                .header("authorization", "Bearer A");
            then.status(200).json_body(json!({"ok": true}));
        });

        let client = test_client(&server);
        client
            .sign_in("user@example.com", "hunter2")
            .await
            .expect("sign in");
        client.sign_out().await.expect("sign out");

        signout.assert();
        assert!(!client.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_sign_out_requires_session() {
        let server = MockServer::start_async().await;
        let client = test_client(&server);

        let err = client.sign_out().await.expect_err("sign-out should fail");
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_sign_up_sends_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/users/signup")
                .header("content-type", "application/json; charset=utf-8")
                .json_body(json!({
                    "email": "new@example.com",
                    "username": "newbie",
                    "password": "hunter2"
                }));
            then.status(201).json_body(json!({"ok": true}));
        });

        let client = test_client(&server);
        let msg = client
            .sign_up("new@example.com", "newbie", "hunter2")
            .await
            .expect("sign up");

        mock.assert();
        assert!(msg.ok);
    }

    #[tokio::test]
    async fn test_sign_up_conflict_maps_to_already_registered() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/users/signup");
            then.status(409).body("ERROR: Existed user!");
        });

        let client = test_client(&server);
        let err = client
            .sign_up("dupe@example.com", "dupe", "hunter2")
            .await
            .expect_err("sign-up should fail");

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::AlreadyRegistered(_))
        ));
    }

    #[tokio::test]
    async fn test_server_error_maps_through_taxonomy() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/users/signin");
            then.status(500).body("Unexpected error");
        });

        let client = test_client(&server);
        let err = client
            .sign_in("user@example.com", "hunter2")
            .await
            .expect_err("sign-in should fail");

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::ServerError(_))
        ));
        assert!(!client.session().is_authenticated().await);
    }
}
