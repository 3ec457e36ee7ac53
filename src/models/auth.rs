use serde::{Deserialize, Serialize};

/// Sign-in request body.
///
/// Serializes to exactly `{"email": ..., "password": ...}` - the backend
/// validates the body against a closed schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-up request body for enrolling a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Successful sign-in payload issued by `/users/signin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Status envelope returned by `/users/ping`, `/users/signout`, and
/// `/users/signup`. The message key is capitalized on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub ok: bool,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}
