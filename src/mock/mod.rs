//! Mock implementations for testing
//!
//! [`RecordingTransport`] records every session and request instead of
//! talking to a bridge, and can be told to fail on open or on send.

use crate::client::{FanCommand, FanSession, FanTransport};
use crate::config::credentials::DeviceCredentials;
use crate::error::{FanError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// One request seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub credentials: DeviceCredentials,
    pub command: FanCommand,
    pub timer: u32,
}

/// How the mock should misbehave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    None,
    /// `open_session` returns a connection error
    OnOpen,
    /// `set_speed` returns a connection error
    OnSend,
    /// `set_speed` returns an authentication error
    Unauthorized,
}

#[derive(Debug, Default)]
struct Recorder {
    requests: Vec<RecordedRequest>,
    opened: usize,
    closed: usize,
}

/// Mock transport for testing
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    recorder: Arc<Mutex<Recorder>>,
    failure: Arc<Mutex<FailureMode>>,
    delay: Option<Duration>,
}

impl RecordingTransport {
    /// Create new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Set failure behaviour for subsequent sessions
    pub fn fail_with(&self, mode: FailureMode) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = mode;
    }

    /// Delay every send, to keep requests in flight
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All requests sent so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Commands sent so far, in order
    pub fn commands(&self) -> Vec<FanCommand> {
        self.lock().requests.iter().map(|r| r.command).collect()
    }

    pub fn sessions_opened(&self) -> usize {
        self.lock().opened
    }

    pub fn sessions_closed(&self) -> usize {
        self.lock().closed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorder> {
        self.recorder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn failure(&self) -> FailureMode {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FanTransport for RecordingTransport {
    async fn open_session(&self, credentials: &DeviceCredentials) -> Result<Box<dyn FanSession>> {
        if self.failure() == FailureMode::OnOpen {
            return Err(FanError::connection("Connection refused (mock)"));
        }

        self.lock().opened += 1;
        Ok(Box::new(RecordingSession {
            transport: self.clone(),
            credentials: credentials.clone(),
            closed: false,
        }))
    }
}

struct RecordingSession {
    transport: RecordingTransport,
    credentials: DeviceCredentials,
    closed: bool,
}

#[async_trait]
impl FanSession for RecordingSession {
    async fn set_speed(&mut self, command: FanCommand, timer: u32) -> Result<()> {
        if self.closed {
            return Err(FanError::connection("Session already closed"));
        }

        self.transport.lock().requests.push(RecordedRequest {
            credentials: self.credentials.clone(),
            command,
            timer,
        });

        if let Some(delay) = self.transport.delay {
            tokio::time::sleep(delay).await;
        }

        match self.transport.failure() {
            FailureMode::OnSend => Err(FanError::connection("Connection reset (mock)")),
            FailureMode::Unauthorized => Err(FanError::authentication("HTTP error 401 (mock)")),
            FailureMode::None | FailureMode::OnOpen => Ok(()),
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.transport.lock().closed += 1;
        }
    }
}
