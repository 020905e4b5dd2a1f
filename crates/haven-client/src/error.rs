//! Client error types

use thiserror::Error;

/// Errors surfaced by the portal client
///
/// UI code branches on `Result` values; nothing in the client panics on a
/// failed request.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Session store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Not logged in")]
    NotAuthenticated,
}

impl ClientError {
    /// HTTP status of a server-side rejection, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
