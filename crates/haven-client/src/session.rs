//! Client session management
//!
//! Talks to the remote auth service, persists the resulting session
//! payload through `SessionStore`, and attaches the bearer token to every
//! subsequent request. This is the single client-side persistence
//! strategy: authentication is always server-backed, with only the
//! resulting payload held locally.

use crate::error::ClientError;
use crate::store::SessionStore;
use haven_core::{config::default_session_path, AuthPayload, SafeIdentity};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Haven API
    pub base_url: String,
    /// Path of the session file
    pub session_path: PathBuf,
}

impl ClientConfig {
    /// Build configuration from environment, with local defaults
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("HAVEN_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            session_path: default_session_path(),
        }
    }
}

/// Registration details collected from the signup form
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    #[serde(rename = "captchaToken")]
    captcha_token: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "captchaToken")]
    captcha_token: &'a str,
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: String,
    message: String,
}

/// Client session holding the current identity and token
pub struct ClientSession {
    http: reqwest::Client,
    base_url: String,
    store: SessionStore,
    current: Option<AuthPayload>,
}

impl ClientSession {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store: SessionStore::new(config.session_path),
            current: None,
        }
    }

    /// Restore a persisted session at application start
    ///
    /// Reads the stored payload and reinstates the in-memory identity and
    /// outbound token. No server round-trip: an expired token is only
    /// discovered when the first protected request comes back 401.
    pub fn restore(&mut self) -> Result<Option<&SafeIdentity>, ClientError> {
        self.current = self.store.load()?;
        Ok(self.identity())
    }

    /// Current identity, if logged in
    pub fn identity(&self) -> Option<&SafeIdentity> {
        self.current.as_ref().map(|payload| &payload.user)
    }

    /// Current bearer token, if logged in
    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|payload| payload.token.as_str())
    }

    /// Register a new account and start a session
    pub async fn register(
        &mut self,
        user: &NewUser,
        captcha_token: &str,
    ) -> Result<SafeIdentity, ClientError> {
        let body = RegisterBody {
            name: &user.name,
            email: &user.email,
            password: &user.password,
            role: user.role.as_deref(),
            captcha_token,
        };

        let response = self
            .http
            .post(format!("{}/auth/register", self.base_url))
            .json(&body)
            .send()
            .await?;

        let payload = Self::parse_auth_response(response).await?;
        self.adopt(payload)
    }

    /// Login with email and password, starting a session
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        captcha_token: &str,
    ) -> Result<SafeIdentity, ClientError> {
        let body = LoginBody {
            email,
            password,
            captcha_token,
        };

        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&body)
            .send()
            .await?;

        let payload = Self::parse_auth_response(response).await?;
        self.adopt(payload)
    }

    /// End the session: forget the token and erase the stored payload
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.current = None;
        self.store.clear()?;
        Ok(())
    }

    /// Request builder with the bearer token attached
    pub fn authorized(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self.token().ok_or(ClientError::NotAuthenticated)?;

        Ok(self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token))
    }

    /// List records in a collection
    pub async fn list_records(
        &self,
        collection: &str,
    ) -> Result<Vec<serde_json::Value>, ClientError> {
        let response = self
            .authorized(Method::GET, &format!("/records/{collection}"))?
            .send()
            .await?;

        Self::parse_json_response(response).await
    }

    /// Create a record in a collection
    pub async fn create_record(
        &self,
        collection: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, ClientError> {
        let response = self
            .authorized(Method::POST, &format!("/records/{collection}"))?
            .json(&payload)
            .send()
            .await?;

        Self::parse_json_response(response).await
    }

    fn adopt(&mut self, payload: AuthPayload) -> Result<SafeIdentity, ClientError> {
        self.store.save(&payload)?;
        let identity = payload.user.clone();
        self.current = Some(payload);
        Ok(identity)
    }

    async fn parse_auth_response(response: reqwest::Response) -> Result<AuthPayload, ClientError> {
        Self::parse_json_response(response).await
    }

    async fn parse_json_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => default_error_message(status),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn default_error_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::Role;
    use uuid::Uuid;

    fn temp_config() -> ClientConfig {
        ClientConfig {
            base_url: "http://localhost:8080/".to_string(),
            session_path: std::env::temp_dir()
                .join(format!("haven-session-test-{}", Uuid::new_v4()))
                .join("session.json"),
        }
    }

    fn sample_payload() -> AuthPayload {
        AuthPayload {
            user: SafeIdentity {
                id: Uuid::new_v4(),
                name: "Ava".to_string(),
                email: "ava@x.com".to_string(),
                role: Role::Victim,
            },
            token: "header.claims.sig".to_string(),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let session = ClientSession::new(temp_config());
        assert_eq!(session.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_restore_on_fresh_store_is_none() {
        let mut session = ClientSession::new(temp_config());
        assert!(session.restore().unwrap().is_none());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_adopt_persists_and_restore_reinstates() {
        let config = temp_config();
        let payload = sample_payload();

        let mut session = ClientSession::new(config.clone());
        let identity = session.adopt(payload.clone()).unwrap();
        assert_eq!(identity.email, "ava@x.com");
        assert_eq!(session.token(), Some("header.claims.sig"));

        // A fresh session over the same store survives the "reload"
        let mut reloaded = ClientSession::new(config);
        let restored = reloaded.restore().unwrap().cloned();
        assert_eq!(restored, Some(payload.user));
        assert_eq!(reloaded.token(), Some("header.claims.sig"));

        reloaded.logout().unwrap();
    }

    #[test]
    fn test_logout_clears_token_and_store() {
        let config = temp_config();
        let mut session = ClientSession::new(config.clone());
        session.adopt(sample_payload()).unwrap();

        session.logout().unwrap();
        assert!(session.identity().is_none());
        assert!(matches!(
            session.authorized(Method::GET, "/records/resources"),
            Err(ClientError::NotAuthenticated)
        ));

        let mut reloaded = ClientSession::new(config);
        assert!(reloaded.restore().unwrap().is_none());
    }

    #[test]
    fn test_register_body_wire_format() {
        let body = RegisterBody {
            name: "Ava",
            email: "Ava@X.com",
            password: "abc123",
            role: Some("victim"),
            captcha_token: "tok",
        };

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"captchaToken\":\"tok\""));
        assert!(!json.contains("captcha_token"));
    }
}
