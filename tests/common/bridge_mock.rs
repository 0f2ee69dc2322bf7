//! WireMock-based nRF905 bridge mocking infrastructure
//!
//! Provides a mock HTTP server that stands in for the bridge's control API.

use nrf905_fan::{DeviceCredentials, HttpTransport, Nrf905Fan};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const USERNAME: &str = "fan";
pub const PASSWORD: &str = "s3cret";

/// Mock nRF905 bridge for testing
pub struct MockBridge {
    pub server: MockServer,
}

impl MockBridge {
    /// Start a bridge with no endpoints mounted
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Answer every "set speed" request with 200
    pub async fn accept_all(&self) {
        Mock::given(method("GET"))
            .and(path("/api/setspeed"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .mount(&self.server)
            .await;
    }

    /// Credentials pointing at the mock server
    pub fn credentials(&self) -> DeviceCredentials {
        DeviceCredentials::new(self.server.address().to_string(), USERNAME, PASSWORD, false)
    }

    /// Fan entity wired to the mock server
    pub fn fan(&self) -> Nrf905Fan<HttpTransport> {
        Nrf905Fan::new(
            "Test fan",
            self.credentials(),
            HttpTransport::new(Duration::from_secs(5)),
        )
    }

    /// `speed` parameter of every request received, in arrival order
    pub async fn speeds(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| {
                request
                    .url
                    .query_pairs()
                    .find(|(key, _)| key == "speed")
                    .map(|(_, value)| value.into_owned())
            })
            .collect()
    }
}
