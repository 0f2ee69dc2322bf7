//! Transport seam between the fan entity and the nRF905 bridge
//!
//! A [`FanTransport`] opens one authenticated [`FanSession`] per dispatch.
//! Sessions are never shared or reused; the caller must [`FanSession::close`]
//! every session it opens, whatever the outcome of the request. `close` is
//! synchronous so it can run from a drop guard when a dispatch is cancelled.

pub mod http_client;

use crate::config::credentials::DeviceCredentials;
use crate::error::Result;
use crate::fan::speed::SpeedLevel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Speed instruction as understood by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanCommand {
    /// Stop the fan (percentage 0)
    Off,
    /// Run at a named speed
    Speed(SpeedLevel),
}

impl FanCommand {
    /// Value of the `speed` parameter on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            FanCommand::Off => "off",
            FanCommand::Speed(level) => level.as_str(),
        }
    }

    /// Percentage this command puts the fan at
    pub fn percentage(&self) -> u8 {
        match self {
            FanCommand::Off => 0,
            FanCommand::Speed(level) => level.percentage(),
        }
    }

    /// Command for a percentage: 0 is off, anything else the nearest level
    pub fn from_percentage(percentage: u32) -> Result<Self> {
        Ok(match SpeedLevel::from_percentage(percentage)? {
            Some(level) => FanCommand::Speed(level),
            None => FanCommand::Off,
        })
    }
}

impl From<SpeedLevel> for FanCommand {
    fn from(level: SpeedLevel) -> Self {
        FanCommand::Speed(level)
    }
}

impl fmt::Display for FanCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One authenticated exchange with the bridge
#[async_trait]
pub trait FanSession: Send {
    /// Send a single "set speed" request
    async fn set_speed(&mut self, command: FanCommand, timer: u32) -> Result<()>;

    /// Release the session; the session must not be used afterwards.
    /// Calling it again is a no-op.
    fn close(&mut self);
}

/// Factory for scoped sessions
#[async_trait]
pub trait FanTransport: Send + Sync {
    /// Open a new authenticated session for `credentials`
    async fn open_session(&self, credentials: &DeviceCredentials) -> Result<Box<dyn FanSession>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(FanCommand::Off.as_str(), "off");
        assert_eq!(FanCommand::Speed(SpeedLevel::Medium).as_str(), "medium");
        assert_eq!(FanCommand::Speed(SpeedLevel::High).to_string(), "high");
    }

    #[test]
    fn test_command_percentages() {
        assert_eq!(FanCommand::Off.percentage(), 0);
        assert_eq!(FanCommand::from(SpeedLevel::High).percentage(), 100);
        assert_eq!(FanCommand::from_percentage(0).unwrap(), FanCommand::Off);
        assert_eq!(
            FanCommand::from_percentage(40).unwrap(),
            FanCommand::Speed(SpeedLevel::Medium)
        );
    }
}
