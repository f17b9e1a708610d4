use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{Endpoints, QueryClient, RemoteError};
use crate::auth::{self, AuthError, Session};
use crate::config::Credentials;
use crate::models::{QueryKind, QueryRequest, QueryResultPage};

/// HTTP client bound to one authenticated session.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: Client,
    endpoints: Endpoints,
    session: Session,
}

impl PlatformClient {
    pub fn new(http: Client, endpoints: Endpoints, session: Session) -> Self {
        Self {
            http,
            endpoints,
            session,
        }
    }

    /// Builds the shared HTTP client with the per-request deadline applied.
    pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
        Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
    }

    /// Logs in and returns a client ready to submit queries.
    pub async fn connect(
        http: Client,
        endpoints: Endpoints,
        credentials: &Credentials,
    ) -> Result<Self, AuthError> {
        let session = auth::login(&http, &endpoints, credentials).await?;
        if let Some(secs) = session.expires_in() {
            debug!("Access token valid for {secs}s");
        }
        Ok(Self::new(http, endpoints, session))
    }
}

#[async_trait]
impl QueryClient for PlatformClient {
    async fn submit(
        &self,
        kind: QueryKind,
        request: &QueryRequest,
    ) -> Result<QueryResultPage, RemoteError> {
        let url = format!("{}{}", self.endpoints.api_base, kind.path());
        debug!("POST {url}");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.session.access_token())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let payload = serde_json::from_str(&body).unwrap_or(Value::String(body));
            let message = error_message(&payload)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
                .to_string();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message,
                payload,
            });
        }

        Ok(response.json::<QueryResultPage>().await?)
    }
}

fn error_message(payload: &Value) -> Option<&str> {
    payload.get("message").and_then(Value::as_str)
}
