//! Device credentials for the nRF905 bridge
//!
//! Credentials are built once from a validated [`FanConfig`](super::FanConfig)
//! and never mutated afterwards.

use crate::error::{FanError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Host, login and transport selection for one fan bridge
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCredentials {
    /// Bridge host, optionally with `:port`
    pub host: String,

    /// Username for basic authentication
    pub username: String,

    /// Password for basic authentication
    pub password: String,

    /// Use HTTPS instead of HTTP
    pub use_ssl: bool,
}

impl DeviceCredentials {
    /// Create credentials for a bridge
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        use_ssl: bool,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            use_ssl,
        }
    }

    /// URL scheme selected by `use_ssl`
    pub fn scheme(&self) -> &'static str {
        if self.use_ssl {
            "https"
        } else {
            "http"
        }
    }

    /// Base URL of the bridge API, e.g. `http://192.168.1.50/`
    pub fn base_url(&self) -> Result<Url> {
        let host = self.host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(FanError::config("Device host must not be empty"));
        }
        if host.contains("://") {
            return Err(FanError::config(format!(
                "Device host must not include a scheme: {host}"
            )));
        }

        let url = Url::parse(&format!("{}://{host}/", self.scheme()))
            .map_err(|e| FanError::config(format!("Invalid device host {host}: {e}")))?;
        if url.path() != "/" {
            return Err(FanError::config(format!(
                "Device host must not include a path: {host}"
            )));
        }
        Ok(url)
    }

    /// `Authorization` header value for basic authentication
    pub fn basic_auth_header(&self) -> String {
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(format!(
                "{username}:{password}",
                username = self.username,
                password = self.password
            ))
        )
    }
}

impl fmt::Debug for DeviceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCredentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_ssl", &self.use_ssl)
            .finish()
    }
}
