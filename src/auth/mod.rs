mod oauth;

pub use oauth::login;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login rejected by the platform (HTTP {status})")]
    Rejected { status: u16, payload: Value },
    #[error("login request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AuthError {
    /// Raw provider error body, when the platform sent one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            AuthError::Rejected { payload, .. } => Some(payload),
            AuthError::Transport(_) => None,
        }
    }
}

/// Bearer token obtained from a client-credentials login.
#[derive(Clone)]
pub struct Session {
    access_token: String,
    token_type: String,
    expires_in: Option<u64>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            expires_in: None,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Token lifetime in seconds as reported at login.
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
