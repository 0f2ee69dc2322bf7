//! HTTP client implementation for nRF905 bridge communication
//!
//! Every session builds its own `reqwest` client carrying the basic
//! authentication header, sends at most a handful of requests and is dropped
//! on close. Nothing is pooled between dispatches.

use crate::client::{FanCommand, FanSession, FanTransport};
use crate::config::credentials::DeviceCredentials;
use crate::error::{FanError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Path of the "set speed" endpoint relative to the bridge root
pub const SET_SPEED_PATH: &str = "api/setspeed";

/// Opens basic-auth HTTP sessions against the bridge
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Per-request timeout
    timeout: Duration,

    /// Accept self-signed certificates on HTTPS bridges
    accept_invalid_certs: bool,
}

impl HttpTransport {
    /// Create a transport with the given request timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            accept_invalid_certs: false,
        }
    }

    /// Accept invalid TLS certificates (bridges usually ship self-signed ones)
    #[must_use]
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    fn build_client(&self, credentials: &DeviceCredentials) -> Result<Client> {
        let mut client_builder = ClientBuilder::new()
            .timeout(self.timeout)
            .user_agent(format!("nrf905-fan/{}", env!("CARGO_PKG_VERSION")));

        if self.accept_invalid_certs {
            warn!("TLS certificate verification disabled for {}", credentials.host);
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let mut default_headers = reqwest::header::HeaderMap::new();
        let mut header_value =
            reqwest::header::HeaderValue::from_str(&credentials.basic_auth_header()).map_err(
                |e| FanError::config(format!("Invalid authorization header: {e}")),
            )?;
        header_value.set_sensitive(true);
        default_headers.insert(reqwest::header::AUTHORIZATION, header_value);
        client_builder = client_builder.default_headers(default_headers);

        client_builder
            .build()
            .map_err(|e| FanError::connection(format!("Failed to build HTTP client: {e}")))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl FanTransport for HttpTransport {
    async fn open_session(&self, credentials: &DeviceCredentials) -> Result<Box<dyn FanSession>> {
        let base_url = credentials.base_url()?;
        let client = self.build_client(credentials)?;

        debug!("Opened HTTP session to {base_url}");
        Ok(Box::new(HttpSession {
            client: Some(client),
            base_url,
        }))
    }
}

/// A single authenticated HTTP session
pub struct HttpSession {
    /// `None` once the session has been closed
    client: Option<Client>,

    base_url: Url,
}

impl HttpSession {
    /// URL of the "set speed" request
    fn set_speed_url(&self, command: FanCommand, timer: u32) -> Result<Url> {
        let mut url = self.base_url.join(SET_SPEED_PATH).map_err(|e| {
            FanError::connection(format!("Invalid URL path {SET_SPEED_PATH}: {e}"))
        })?;
        url.query_pairs_mut()
            .append_pair("speed", command.as_str())
            .append_pair("timer", &timer.to_string());
        Ok(url)
    }
}

#[async_trait]
impl FanSession for HttpSession {
    async fn set_speed(&mut self, command: FanCommand, timer: u32) -> Result<()> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| FanError::connection("Session already closed"))?;
        let url = self.set_speed_url(command, timer)?;

        debug!("Sending speed '{command}' (timer {timer}) to {}", self.base_url);

        let response = client.get(url).send().await.map_err(|e| {
            let error_msg = format!("HTTP request failed: {e}");
            if e.is_timeout() {
                FanError::timeout(error_msg)
            } else if e.is_connect() {
                FanError::connection(error_msg)
            } else {
                FanError::Http(e)
            }
        })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            FanError::connection(format!("Failed to read bridge response ({status}): {e}"))
        })?;

        if status.is_success() {
            debug!("Bridge accepted speed '{command}': {status} {response_text}");
            return Ok(());
        }

        let error_msg = format!("HTTP error {status}: {response_text}");
        Err(match status.as_u16() {
            401 => FanError::authentication(error_msg),
            403 => FanError::authentication("Access denied"),
            404 => FanError::device_control("Set speed endpoint not found"),
            _ => FanError::device_control(error_msg),
        })
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("Closed HTTP session to {}", self.base_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fan::speed::SpeedLevel;

    fn session(host: &str) -> HttpSession {
        HttpSession {
            client: Some(Client::new()),
            base_url: DeviceCredentials::new(host, "u", "p", false)
                .base_url()
                .unwrap(),
        }
    }

    #[test]
    fn test_set_speed_url() {
        let url = session("fan.local:8080")
            .set_speed_url(FanCommand::Speed(SpeedLevel::Medium), 15)
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://fan.local:8080/api/setspeed?speed=medium&timer=15"
        );
    }

    #[tokio::test]
    async fn test_closed_session_refuses_requests() {
        let mut session = session("fan.local");
        session.close();
        session.close();

        let result = session.set_speed(FanCommand::Off, 0).await;
        assert!(matches!(result, Err(FanError::Connection(_))));
    }
}
