//! Configuration loading from TOML files with environment overrides.
//!
//! Access tokens are secrets and may be supplied through the environment
//! (`CARTSYNC_STOREFRONT_TOKEN`, `CARTSYNC_ADMIN_TOKEN`) instead of the
//! config file; `.env` files are honored via dotenvy.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

const STOREFRONT_TOKEN_ENV: &str = "CARTSYNC_STOREFRONT_TOKEN";
const ADMIN_TOKEN_ENV: &str = "CARTSYNC_ADMIN_TOKEN";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub storefront: StorefrontConfig,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storefront GraphQL API endpoint and access token.
#[derive(Debug, Deserialize)]
pub struct StorefrontConfig {
    pub api_url: String,
    #[serde(default)]
    pub access_token: String,
}

/// Admin GraphQL API, used only for server-side cart reference persistence.
/// Optional: without it the client-held reference alone carries continuity.
#[derive(Debug, Deserialize)]
pub struct AdminConfig {
    pub api_url: String,
    #[serde(default)]
    pub access_token: String,
}

/// Where the local cart snapshot lives.
#[derive(Debug, Deserialize)]
pub struct PersistenceConfig {
    pub snapshot_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("cart-state.json"),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Missing .env files are fine; real errors are not.
        let _ = dotenvy::dotenv();

        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        if let Ok(token) = std::env::var(STOREFRONT_TOKEN_ENV) {
            config.storefront.access_token = token;
        }
        if let (Some(admin), Ok(token)) = (config.admin.as_mut(), std::env::var(ADMIN_TOKEN_ENV)) {
            admin.access_token = token;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.storefront.api_url.is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        if let Err(error) = url::Url::parse(&self.storefront.api_url) {
            return Err(ConfigError::InvalidValue {
                field: "api_url",
                reason: error.to_string(),
            }
            .into());
        }
        if self.storefront.access_token.is_empty() {
            return Err(ConfigError::MissingField {
                field: "access_token",
            }
            .into());
        }
        if let Some(admin) = &self.admin {
            if admin.api_url.is_empty() {
                return Err(ConfigError::MissingField {
                    field: "admin.api_url",
                }
                .into());
            }
            if let Err(error) = url::Url::parse(&admin.api_url) {
                return Err(ConfigError::InvalidValue {
                    field: "admin.api_url",
                    reason: error.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
