//! Request and response bodies shared by the HTTP clients and the server.

use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Returned by sign-up and sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub uid: String,
    pub email: String,
    pub token: String,
}

/// Query string for field-equality lookups. `equals` holds a JSON-encoded
/// scalar so numbers and strings stay distinguishable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentQuery {
    pub field: Option<String>,
    pub equals: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
