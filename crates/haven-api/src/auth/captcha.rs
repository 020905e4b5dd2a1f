//! CAPTCHA verification against the reCAPTCHA siteverify endpoint
//!
//! Registration and login both post the client-supplied challenge token,
//! together with the deployment secret, to the external verification
//! service. A failed outbound call is an error for the enclosing
//! operation; it is never treated as a successful verification, and there
//! is no retry.

use haven_core::config::CaptchaConfig;
use serde::Deserialize;
use thiserror::Error;

/// CAPTCHA verification errors
#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("CAPTCHA verification request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Response body from the verification service
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verifies client CAPTCHA challenge tokens with the external service.
///
/// The secret is injected at construction from validated configuration;
/// a missing secret is a startup failure, never a per-request condition.
#[derive(Debug, Clone)]
pub struct CaptchaVerifier {
    http: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl CaptchaVerifier {
    /// Create a verifier from validated configuration
    pub fn new(config: &CaptchaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret: config.secret.clone(),
            verify_url: config.verify_url.clone(),
        }
    }

    /// Verify a client-supplied challenge token
    ///
    /// Returns the success flag reported by the verification service.
    /// One outbound call per invocation; network failures propagate.
    pub async fn verify(&self, challenge_token: &str) -> Result<bool, CaptchaError> {
        let params = [
            ("secret", self.secret.as_str()),
            ("response", challenge_token),
        ];

        let response: VerifyResponse = self
            .http
            .post(&self.verify_url)
            .form(&params)
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            tracing::debug!(error_codes = ?response.error_codes, "CAPTCHA rejected");
        }

        Ok(response.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_verifier() -> CaptchaVerifier {
        CaptchaVerifier::new(&CaptchaConfig {
            secret: "test-captcha-secret".to_string(),
            verify_url: "http://127.0.0.1:1/siteverify".to_string(),
        })
    }

    #[test]
    fn test_verify_response_parsing() {
        let ok: VerifyResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(ok.success);
        assert!(ok.error_codes.is_empty());

        let rejected: VerifyResponse = serde_json::from_str(
            r#"{"success": false, "error-codes": ["invalid-input-response"]}"#,
        )
        .unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.error_codes, vec!["invalid-input-response"]);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        // Port 1 refuses connections; the operation must fail, not pass.
        let verifier = test_verifier();
        let result = verifier.verify("some-challenge").await;
        assert!(matches!(result, Err(CaptchaError::Request(_))));
    }
}
