mod region;

pub use region::{Region, UnknownRegion};

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

pub const CLIENT_ID_VAR: &str = "GENESYS_CLOUD_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "GENESYS_CLOUD_CLIENT_SECRET";
pub const REGION_VAR: &str = "GENESYS_CLOUD_REGION";
pub const TIME_ZONE_VAR: &str = "TALLY_TIME_ZONE";
pub const PAGE_SIZE_VAR: &str = "TALLY_PAGE_SIZE";
pub const HTTP_TIMEOUT_VAR: &str = "TALLY_HTTP_TIMEOUT_SECS";

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("UUID pattern is valid")
});

/// Hyphenated UUID check used for client ids and conversation ids.
pub fn is_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
    #[error("{0} environment variable is not a valid UUID, check for leading and trailing whitespace")]
    InvalidUuid(&'static str),
    #[error("{0} environment variable is empty")]
    Empty(&'static str),
    #[error("{var} environment variable '{value}' is not a known region")]
    UnknownRegion { var: &'static str, value: String },
    #[error("{var} environment variable '{value}' is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub query: QueryDefaults,
    pub http: HttpConfig,
}

#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub region: Region,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct QueryDefaults {
    /// IANA zone sent with every aggregate query
    pub time_zone: String,
    /// Page size for detail queries
    pub page_size: u32,
}

impl QueryDefaults {
    pub const DEFAULT_TIME_ZONE: &'static str = "America/Bogota";
    pub const DEFAULT_PAGE_SIZE: u32 = 100;
    /// Largest page the detail endpoint accepts.
    pub const MAX_PAGE_SIZE: u32 = 100;
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            time_zone: Self::DEFAULT_TIME_ZONE.to_string(),
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
}

impl HttpConfig {
    const fn default_timeout_secs() -> u64 {
        30
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(Self::default_timeout_secs()),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Credentials are checked in order (client id, secret, region) and the
    /// first problem found is returned.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup(CLIENT_ID_VAR).ok_or(ConfigError::Missing(CLIENT_ID_VAR))?;
        if !is_uuid(&client_id) {
            return Err(ConfigError::InvalidUuid(CLIENT_ID_VAR));
        }

        let client_secret =
            lookup(CLIENT_SECRET_VAR).ok_or(ConfigError::Missing(CLIENT_SECRET_VAR))?;
        if client_secret.is_empty() {
            return Err(ConfigError::Empty(CLIENT_SECRET_VAR));
        }

        let region_str = lookup(REGION_VAR).ok_or(ConfigError::Missing(REGION_VAR))?;
        let region = region_str
            .parse::<Region>()
            .map_err(|UnknownRegion(value)| ConfigError::UnknownRegion {
                var: REGION_VAR,
                value,
            })?;

        let time_zone = match lookup(TIME_ZONE_VAR) {
            Some(tz) if tz.trim().is_empty() => return Err(ConfigError::Empty(TIME_ZONE_VAR)),
            Some(tz) => tz,
            None => QueryDefaults::DEFAULT_TIME_ZONE.to_string(),
        };

        let page_size = parse_positive(&lookup, PAGE_SIZE_VAR)?
            .unwrap_or(u64::from(QueryDefaults::DEFAULT_PAGE_SIZE));
        if page_size > u64::from(QueryDefaults::MAX_PAGE_SIZE) {
            return Err(ConfigError::Invalid {
                var: PAGE_SIZE_VAR,
                value: page_size.to_string(),
                reason: format!("must be at most {}", QueryDefaults::MAX_PAGE_SIZE),
            });
        }
        let page_size = page_size as u32;

        let timeout_secs = parse_positive(&lookup, HTTP_TIMEOUT_VAR)?
            .unwrap_or_else(HttpConfig::default_timeout_secs);

        Ok(Config {
            credentials: Credentials {
                client_id,
                client_secret,
                region,
            },
            query: QueryDefaults {
                time_zone,
                page_size,
            },
            http: HttpConfig {
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_positive<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(value) => Ok(Some(value)),
        Err(e) => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: e.to_string(),
        }),
    }
}
