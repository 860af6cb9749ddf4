//! Process configuration for the data layer.
//!
//! Configuration is read once at startup and handed to the clients that need
//! it. Nothing in the library reads the environment after construction.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Environment variable holding the spreadsheet backend base URL.
pub const SHEETS_API_URL_VAR: &str = "SHEETS_API_URL";
/// Environment variable holding the spreadsheet backend auth token.
pub const SHEETS_API_TOKEN_VAR: &str = "SHEETS_API_TOKEN";
/// Environment variable holding the media host cloud name.
pub const MEDIA_CLOUD_NAME_VAR: &str = "MEDIA_CLOUD_NAME";
/// Environment variable holding the media host API key.
pub const MEDIA_API_KEY_VAR: &str = "MEDIA_API_KEY";
/// Environment variable holding the media host API secret.
pub const MEDIA_API_SECRET_VAR: &str = "MEDIA_API_SECRET";
/// Environment variable overriding the media host API base URL.
pub const MEDIA_API_BASE_URL_VAR: &str = "MEDIA_API_BASE_URL";

/// Default versioned API root of the media host.
pub const DEFAULT_MEDIA_API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configured URL could not be parsed.
    #[error("invalid URL in {variable}: {value}")]
    InvalidUrl {
        /// The variable that carried the value.
        variable: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Connection settings for the spreadsheet backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    /// Single endpoint that accepts every action.
    pub base_url: Url,
    /// Shared secret sent as the `token` query parameter.
    pub token: String,
}

/// Credentials for the media host.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaConfig {
    /// Account ("cloud") name used in API paths.
    pub cloud_name: String,
    /// Public API key sent with signed requests.
    pub api_key: String,
    /// Secret appended to canonical signing strings. Never sent.
    pub api_secret: String,
    /// Versioned API root, e.g. `https://api.cloudinary.com/v1_1`.
    pub api_base_url: Url,
}

impl std::fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base_url", &self.api_base_url.as_str())
            .finish()
    }
}

/// Full data-layer configuration, immutable after startup.
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    /// Backend settings; `None` means reads degrade to empty results.
    pub sheets: Option<Arc<SheetsConfig>>,
    /// Media host credentials; `None` disables signing.
    pub media: Option<Arc<MediaConfig>>,
}

impl SiteConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a URL variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a URL variable is set but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let sheets = match get(SHEETS_API_URL_VAR) {
            Some(raw) => {
                let base_url = parse_url(SHEETS_API_URL_VAR, &raw)?;
                let token = get(SHEETS_API_TOKEN_VAR).unwrap_or_default();
                if token.is_empty() {
                    warn!("{SHEETS_API_TOKEN_VAR} is not set; backend requests will be unauthenticated");
                }
                Some(Arc::new(SheetsConfig { base_url, token }))
            }
            None => {
                debug!("{SHEETS_API_URL_VAR} not set; collection reads will return empty results");
                None
            }
        };

        let media = match (
            get(MEDIA_CLOUD_NAME_VAR),
            get(MEDIA_API_KEY_VAR),
            get(MEDIA_API_SECRET_VAR),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => {
                let api_base_url = match get(MEDIA_API_BASE_URL_VAR) {
                    Some(raw) => parse_url(MEDIA_API_BASE_URL_VAR, &raw)?,
                    None => parse_url(MEDIA_API_BASE_URL_VAR, DEFAULT_MEDIA_API_BASE_URL)?,
                };
                Some(Arc::new(MediaConfig {
                    cloud_name,
                    api_key,
                    api_secret,
                    api_base_url,
                }))
            }
            (None, None, None) => None,
            _ => {
                warn!(
                    "media credentials are incomplete ({MEDIA_CLOUD_NAME_VAR}, {MEDIA_API_KEY_VAR}, {MEDIA_API_SECRET_VAR}); signing disabled"
                );
                None
            }
        };

        Ok(Self { sheets, media })
    }
}

fn parse_url(variable: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|_| ConfigError::InvalidUrl {
        variable,
        value: raw.to_string(),
    })
}
