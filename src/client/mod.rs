//! Query submission seam between the fetcher and the remote platform.

mod platform;

pub use platform::PlatformClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::Region;
use crate::models::{QueryKind, QueryRequest, QueryResultPage};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("platform returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        payload: Value,
    },
    #[error("query request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RemoteError {
    /// Raw provider error body, when the platform sent one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            RemoteError::Status { payload, .. } => Some(payload),
            RemoteError::Transport(_) => None,
        }
    }
}

/// Anything that can answer analytics queries, one page per call.
#[async_trait]
pub trait QueryClient: Send + Sync {
    async fn submit(
        &self,
        kind: QueryKind,
        request: &QueryRequest,
    ) -> Result<QueryResultPage, RemoteError>;
}

/// Base URLs for the login and API hosts, without trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login_base: String,
    pub api_base: String,
}

impl Endpoints {
    pub fn new(login_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            login_base: login_base.into().trim_end_matches('/').to_string(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn for_region(region: Region) -> Self {
        let host = region.host();
        Self::new(format!("https://login.{host}"), format!("https://api.{host}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_endpoints() {
        let endpoints = Endpoints::for_region(Region::EuWest1);
        assert_eq!(endpoints.login_base, "https://login.mypurecloud.ie");
        assert_eq!(endpoints.api_base, "https://api.mypurecloud.ie");
    }

    #[test]
    fn test_endpoints_trim_trailing_slash() {
        let endpoints = Endpoints::new("http://127.0.0.1:9000/", "http://127.0.0.1:9001//");
        assert_eq!(endpoints.login_base, "http://127.0.0.1:9000");
        assert_eq!(endpoints.api_base, "http://127.0.0.1:9001");
    }
}
