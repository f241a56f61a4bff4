//! Client for the authentication endpoints.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::{ErrorBody, SessionResponse, SignInRequest, SignUpRequest};
use crate::models::User;

/// A signed-in session, persisted in the config file between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub token: String,
}

impl From<SessionResponse> for Session {
    fn from(response: SessionResponse) -> Self {
        Self {
            uid: response.uid,
            email: response.email,
            token: response.token,
        }
    }
}

/// Errors that can occur during authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong email or password
    #[error("Incorrect email or password")]
    InvalidCredentials,
    /// Session token no longer valid
    #[error("Session expired. Sign in again.")]
    SessionExpired,
    /// Server rejected the request
    #[error("{error}: {message}")]
    Rejected { error: String, message: String },
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(String),
}

pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/signin", self.base_url))
            .json(&SignInRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        let body: SessionResponse = parse(response).await?;
        Ok(body.into())
    }

    pub async fn sign_up(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/signup", self.base_url))
            .json(&SignUpRequest {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        let body: SessionResponse = parse(response).await?;
        Ok(body.into())
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/signout", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        match response.status() {
            // Already gone server-side counts as signed out
            status if status.is_success() || status == StatusCode::UNAUTHORIZED => Ok(()),
            _ => Err(rejection(response).await),
        }
    }

    pub async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let response = self
            .client
            .get(format!("{}/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::SessionExpired);
        }
        parse(response).await
    }
}

async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, AuthError> {
    if !response.status().is_success() {
        return Err(rejection(response).await);
    }
    response
        .json()
        .await
        .map_err(|e| AuthError::Http(e.to_string()))
}

async fn rejection(response: reqwest::Response) -> AuthError {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => AuthError::Rejected {
            error: body.error,
            message: body.message,
        },
        Err(_) => AuthError::Rejected {
            error: status.as_u16().to_string(),
            message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = AuthClient::new("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_session_from_response() {
        let session: Session = SessionResponse {
            uid: "u1".into(),
            email: "a@example.com".into(),
            token: "tok".into(),
        }
        .into();
        assert_eq!(session.uid, "u1");
        assert_eq!(session.token, "tok");
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Incorrect email or password"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = AuthClient::new("http://127.0.0.1:9");
        let result = client.sign_in("a@example.com", "hunter22").await;
        assert!(matches!(result, Err(AuthError::Http(_))));
    }
}
