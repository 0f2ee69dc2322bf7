//! nRF905 fan integration
//!
//! Exposes a fan behind an nRF905 radio bridge as a home-automation fan
//! entity. Host calls (turn on/off, preset, percentage) are translated into a
//! single basic-auth HTTP "set speed" request against the bridge.
//!
//! # Features
//!
//! - Ordered speed vocabulary (low, medium, high) with percentage mapping
//! - One scoped HTTP session per command, closed on every exit path
//! - Per-entity command ordering and confirmed-only state updates
//! - TOML and environment configuration without default secrets

// Core modules
pub mod client;
pub mod config;
pub mod error;
pub mod fan;
pub mod logging;
pub mod platform;

// Test support modules - available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Re-export main types for convenience
pub use client::http_client::HttpTransport;
pub use client::{FanCommand, FanSession, FanTransport};
pub use config::{credentials::DeviceCredentials, FanConfig};
pub use error::{FanError, Result};
pub use fan::{FanEntity, Nrf905Fan, SpeedLevel};
