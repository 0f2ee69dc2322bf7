//! Fan entity exposed to the home-automation host
//!
//! [`Nrf905Fan`] turns each host call into exactly one "set speed" request.
//! Calls on the same entity are serialized by a command lock so they reach
//! the bridge in the order they were issued, and local state only changes
//! after the bridge accepted a command.

use crate::client::http_client::HttpTransport;
use crate::client::{FanCommand, FanSession, FanTransport};
use crate::config::credentials::DeviceCredentials;
use crate::config::FanConfig;
use crate::error::{ErrorReporter, Result};
use crate::fan::speed::{level_count, percentage_of, SpeedLevel, PRESET_MODES};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Icon shown by the host for this entity
pub const FAN_ICON: &str = "mdi:air-conditioner";

/// Capabilities advertised to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FanFeature {
    SetSpeed,
    PresetMode,
    TurnOn,
    TurnOff,
}

const SUPPORTED_FEATURES: [FanFeature; 4] = [
    FanFeature::SetSpeed,
    FanFeature::PresetMode,
    FanFeature::TurnOn,
    FanFeature::TurnOff,
];

/// Outcome of the most recent dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DispatchState {
    /// Nothing sent yet
    #[default]
    Idle,
    /// A command is in flight
    Dispatching,
    /// The bridge accepted the last command
    Confirmed,
    /// The last command failed
    Failed,
}

/// Locally assumed state of the fan
///
/// Nothing is read back from the device, so the values only reflect commands
/// the bridge accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanEntityState {
    pub is_on: Option<bool>,
    pub percentage: Option<u8>,
    pub preset_mode: Option<SpeedLevel>,
    pub dispatch: DispatchState,
    pub last_dispatch: Option<DateTime<Utc>>,
}

/// Contract the host platform drives a fan through
#[async_trait]
pub trait FanEntity: Send + Sync {
    /// Display name
    fn name(&self) -> &str;

    /// `None` until a command has been confirmed
    fn is_on(&self) -> Option<bool>;

    /// Current speed percentage, if known
    fn percentage(&self) -> Option<u8>;

    /// Current preset, if known and not off
    fn preset_mode(&self) -> Option<SpeedLevel>;

    fn preset_modes(&self) -> &'static [SpeedLevel] {
        &PRESET_MODES
    }

    /// Number of speeds, used by the host to size its percentage steps
    fn speed_count(&self) -> usize {
        level_count()
    }

    fn supported_features(&self) -> &'static [FanFeature] {
        &SUPPORTED_FEATURES
    }

    fn icon(&self) -> &str {
        FAN_ICON
    }

    fn should_poll(&self) -> bool {
        false
    }

    /// Turn on: preset wins over percentage, default is full speed
    async fn turn_on(&self, percentage: Option<u32>, preset_mode: Option<&str>) -> Result<()>;

    async fn turn_off(&self) -> Result<()>;

    async fn set_percentage(&self, percentage: u32) -> Result<()>;

    async fn set_preset_mode(&self, preset_mode: &str) -> Result<()>;

    /// Refresh hook called by the host's polling lifecycle
    fn update(&self) {}
}

/// An nRF905 bridge fan
pub struct Nrf905Fan<T: FanTransport = HttpTransport> {
    name: String,
    credentials: DeviceCredentials,
    transport: T,
    timer: u32,
    state: RwLock<FanEntityState>,
    command_lock: Mutex<()>,
}

impl<T: FanTransport> Nrf905Fan<T> {
    /// Create an entity talking to `credentials.host` through `transport`
    pub fn new(name: impl Into<String>, credentials: DeviceCredentials, transport: T) -> Self {
        Self {
            name: name.into(),
            credentials,
            transport,
            timer: 0,
            state: RwLock::new(FanEntityState::default()),
            command_lock: Mutex::new(()),
        }
    }

    /// Create an entity from a validated configuration
    pub fn from_config(config: &FanConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.name.clone(), config.credentials(), transport).with_timer(config.timer))
    }

    /// Timer value sent with every command
    #[must_use]
    pub fn with_timer(mut self, timer: u32) -> Self {
        self.timer = timer;
        self
    }

    pub fn credentials(&self) -> &DeviceCredentials {
        &self.credentials
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Snapshot of the local state
    pub fn state(&self) -> FanEntityState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dispatch_state(&self) -> DispatchState {
        self.state().dispatch
    }

    /// Send one command and record the outcome
    async fn dispatch(&self, command: FanCommand) -> Result<()> {
        let span = info_span!(
            "dispatch",
            id = %Uuid::new_v4(),
            entity = %self.name,
            command = %command
        );

        async {
            let _guard = self.command_lock.lock().await;
            let pending = PendingDispatch::start(&self.state);

            let outcome = self.send(command).await;
            match &outcome {
                Ok(()) => {
                    debug!("Command confirmed");
                    pending.confirm(command);
                }
                Err(e) => {
                    warn!("Failed to send speed '{command}' to {}", self.credentials.host);
                    ErrorReporter::log_error(e, "set_speed");
                    pending.fail();
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Open a session, send, and close it on every path
    async fn send(&self, command: FanCommand) -> Result<()> {
        let mut session = ScopedSession(self.transport.open_session(&self.credentials).await?);
        session.0.set_speed(command, self.timer).await
    }
}

/// Closes the wrapped session when dropped, including on cancellation
struct ScopedSession(Box<dyn FanSession>);

impl Drop for ScopedSession {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Marks the entity `Dispatching` until the outcome is recorded
///
/// Dropping it unresolved (the caller abandoned the future) records `Failed`.
struct PendingDispatch<'a> {
    state: &'a RwLock<FanEntityState>,
    resolved: bool,
}

impl<'a> PendingDispatch<'a> {
    fn start(state: &'a RwLock<FanEntityState>) -> Self {
        let pending = Self {
            state,
            resolved: false,
        };
        pending.update(|state| state.dispatch = DispatchState::Dispatching);
        pending
    }

    fn update(&self, f: impl FnOnce(&mut FanEntityState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    fn confirm(mut self, command: FanCommand) {
        self.resolved = true;
        self.update(|state| {
            state.is_on = Some(command != FanCommand::Off);
            state.percentage = Some(command.percentage());
            state.preset_mode = match command {
                FanCommand::Speed(level) => Some(level),
                FanCommand::Off => None,
            };
            state.dispatch = DispatchState::Confirmed;
            state.last_dispatch = Some(Utc::now());
        });
    }

    fn fail(mut self) {
        self.resolved = true;
        self.record_failure();
    }

    fn record_failure(&self) {
        self.update(|state| {
            state.dispatch = DispatchState::Failed;
            state.last_dispatch = Some(Utc::now());
        });
    }
}

impl Drop for PendingDispatch<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            warn!("Dispatch cancelled before the bridge answered");
            self.record_failure();
        }
    }
}

#[async_trait]
impl<T: FanTransport> FanEntity for Nrf905Fan<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_on(&self) -> Option<bool> {
        self.state().is_on
    }

    fn percentage(&self) -> Option<u8> {
        self.state().percentage
    }

    fn preset_mode(&self) -> Option<SpeedLevel> {
        self.state().preset_mode
    }

    async fn turn_on(&self, percentage: Option<u32>, preset_mode: Option<&str>) -> Result<()> {
        info!("Turning on {}", self.name);

        if let Some(preset_mode) = preset_mode {
            return self.set_preset_mode(preset_mode).await;
        }
        if let Some(percentage) = percentage {
            return self.set_percentage(percentage).await;
        }
        self.dispatch(FanCommand::Speed(SpeedLevel::High)).await
    }

    async fn turn_off(&self) -> Result<()> {
        info!("Turning off {}", self.name);
        self.dispatch(FanCommand::Off).await
    }

    async fn set_percentage(&self, percentage: u32) -> Result<()> {
        info!("Setting {} to {percentage}%", self.name);
        let command = FanCommand::from_percentage(percentage)?;
        debug!("Percentage {percentage} resolves to '{command}'");
        self.dispatch(command).await
    }

    async fn set_preset_mode(&self, preset_mode: &str) -> Result<()> {
        let percentage = percentage_of(preset_mode)?;
        info!("Setting {} to preset {preset_mode} ({percentage}%)", self.name);

        let level: SpeedLevel = preset_mode.parse()?;
        self.dispatch(FanCommand::Speed(level)).await
    }

    fn update(&self) {}
}

impl<T: FanTransport> std::fmt::Debug for Nrf905Fan<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nrf905Fan")
            .field("name", &self.name)
            .field("credentials", &self.credentials)
            .field("timer", &self.timer)
            .field("state", &self.state())
            .finish()
    }
}
