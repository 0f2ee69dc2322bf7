//! Configuration management for the nRF905 fan integration
//!
//! Settings are read from an optional TOML file and `NRF905_*` environment
//! variables (environment wins) and validated eagerly. Host, username and
//! password are required; no default secret is ever supplied.

pub mod credentials;

use crate::error::{FanError, Result};
use credentials::DeviceCredentials;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "NRF905";

/// Default entity display name
pub const DEFAULT_NAME: &str = "nrf905";

/// Values that take precedence over file and environment, e.g. CLI flags
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub name: Option<String>,
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_ssl: Option<bool>,
    pub timer: Option<u32>,
}

/// Fan entity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanConfig {
    /// Display name of the entity
    #[serde(default = "default_name")]
    pub name: String,

    /// Bridge host, optionally with `:port`
    pub host: String,

    /// Username for basic authentication
    pub username: String,

    /// Password for basic authentication
    pub password: String,

    /// Use HTTPS instead of HTTP
    #[serde(default)]
    pub use_ssl: bool,

    /// Verify the bridge's TLS certificate when `use_ssl` is set
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// Timer value sent with every speed command
    #[serde(default)]
    pub timer: u32,

    /// Request timeout
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_verify_ssl() -> bool {
    true
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

impl FanConfig {
    /// Create a configuration with defaults for everything but the credentials
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: default_name(),
            host: host.into(),
            username: username.into(),
            password: password.into(),
            use_ssl: false,
            verify_ssl: default_verify_ssl(),
            timer: 0,
            timeout: default_timeout(),
        }
    }

    /// Load from an optional TOML file plus `NRF905_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_overrides(path, &ConfigOverrides::default())
    }

    /// Like [`FanConfig::load`], with explicit values taking precedence
    pub fn load_with_overrides(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(FanError::config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .set_override_option("name", overrides.name.clone())
            .and_then(|b| b.set_override_option("host", overrides.host.clone()))
            .and_then(|b| b.set_override_option("username", overrides.username.clone()))
            .and_then(|b| b.set_override_option("password", overrides.password.clone()))
            .and_then(|b| b.set_override_option("use_ssl", overrides.use_ssl))
            .and_then(|b| b.set_override_option("timer", overrides.timer.map(u64::from)))
            .and_then(|b| b.build())
            .map_err(|e| FanError::config(format!("Failed to read configuration: {e}")))?;

        let config: FanConfig = settings
            .try_deserialize()
            .map_err(|e| FanError::config(format!("Invalid configuration: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()
            .map_err(|e| FanError::config(format!("Failed to parse configuration: {e}")))?;

        let config: FanConfig = settings
            .try_deserialize()
            .map_err(|e| FanError::config(format!("Invalid configuration: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject empty credentials and unusable hosts
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FanError::config("name must not be empty"));
        }
        if self.username.is_empty() {
            return Err(FanError::config("username is required"));
        }
        if self.password.is_empty() {
            return Err(FanError::config("password is required"));
        }
        if self.timeout.is_zero() {
            return Err(FanError::config("timeout must be greater than zero"));
        }

        self.credentials().base_url()?;
        Ok(())
    }

    /// Credentials handed to the entity
    pub fn credentials(&self) -> DeviceCredentials {
        DeviceCredentials::new(
            self.host.clone(),
            self.username.clone(),
            self.password.clone(),
            self.use_ssl,
        )
    }
}
