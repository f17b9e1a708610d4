use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info};

use super::{AuthError, Session};
use crate::client::Endpoints;
use crate::config::Credentials;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "TokenResponse::default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn default_token_type() -> String {
        "bearer".to_string()
    }
}

/// Client-credentials grant against `{login_base}/oauth/token`.
pub async fn login(
    http: &Client,
    endpoints: &Endpoints,
    credentials: &Credentials,
) -> Result<Session, AuthError> {
    let url = format!("{}/oauth/token", endpoints.login_base);
    debug!("Requesting access token from {url}");

    let response = http
        .post(&url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .inspect_err(|e| error!("Could not reach the login endpoint: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let payload = serde_json::from_str(&body).unwrap_or(Value::String(body));
        error!("An error occurred while authenticating (HTTP {})", status.as_u16());
        debug!("Platform returned error payload: {payload:#}");
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            payload,
        });
    }

    let token: TokenResponse = response.json().await?;
    info!(
        "Authenticated against {} (client {})",
        credentials.region, credentials.client_id
    );

    Ok(Session {
        access_token: token.access_token,
        token_type: token.token_type,
        expires_in: token.expires_in,
    })
}
