//! Error types for the nRF905 fan integration
//!
//! This module provides the error taxonomy shared by the speed vocabulary,
//! the configuration layer and the HTTP dispatch path, together with
//! structured error codes and production-safe messages for logging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for fan operations
pub type Result<T> = std::result::Result<T, FanError>;

/// Error types for nRF905 fan operations
#[derive(Error, Debug)]
pub enum FanError {
    /// Requested preset/speed name is not part of the vocabulary
    #[error("Invalid speed level: {0}")]
    InvalidSpeedLevel(String),

    /// Requested percentage is outside 0..=100
    #[error("Invalid speed percentage: {0} (expected 0-100)")]
    InvalidPercentage(u32),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Device rejected the supplied credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Device answered but did not accept the command
    #[error("Device control error: {0}")]
    DeviceControl(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Structured error code for machine-readable error handling
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Connection errors (1000-1099)
    ConnectionTimeout,
    ConnectionRefused,

    // Authentication errors (1100-1199)
    InvalidCredentials,

    // Configuration errors (1200-1299)
    ConfigurationInvalid,

    // Device errors (1300-1399)
    DeviceControlFailed,

    // Data errors (1400-1499)
    InvalidInput,

    // Service errors (1600-1699)
    ExternalServiceError,
}

impl ErrorCode {
    /// Get numeric error code
    pub fn as_number(&self) -> u32 {
        match self {
            ErrorCode::ConnectionTimeout => 1001,
            ErrorCode::ConnectionRefused => 1002,
            ErrorCode::InvalidCredentials => 1101,
            ErrorCode::ConfigurationInvalid => 1202,
            ErrorCode::DeviceControlFailed => 1303,
            ErrorCode::InvalidInput => 1402,
            ErrorCode::ExternalServiceError => 1603,
        }
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        match self.as_number() {
            1000..=1099 => "connection",
            1100..=1199 => "authentication",
            1200..=1299 => "configuration",
            1300..=1399 => "device",
            1400..=1499 => "data",
            1600..=1699 => "service",
            _ => "unknown",
        }
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Medium severity - warning condition
    Warning,
    /// High severity - error condition
    Error,
    /// Critical severity - immediate attention required
    Critical,
}

impl FanError {
    /// Create an invalid speed level error
    pub fn invalid_speed_level<S: Into<String>>(name: S) -> Self {
        Self::InvalidSpeedLevel(name.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }

    /// Create an authentication error
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a device control error
    pub fn device_control<S: Into<String>>(msg: S) -> Self {
        Self::DeviceControl(msg.into())
    }

    /// Map FanError to structured error code
    pub fn to_error_code(&self) -> ErrorCode {
        match self {
            FanError::InvalidSpeedLevel(_) | FanError::InvalidPercentage(_) => {
                ErrorCode::InvalidInput
            }
            FanError::Config(_) => ErrorCode::ConfigurationInvalid,
            FanError::Connection(_) => ErrorCode::ConnectionRefused,
            FanError::Authentication(_) => ErrorCode::InvalidCredentials,
            FanError::Timeout(_) => ErrorCode::ConnectionTimeout,
            FanError::DeviceControl(_) => ErrorCode::DeviceControlFailed,
            FanError::Http(_) => ErrorCode::ExternalServiceError,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FanError::Authentication(_) => ErrorSeverity::Critical,
            FanError::Config(_) | FanError::DeviceControl(_) => ErrorSeverity::Error,
            FanError::Connection(_) | FanError::Timeout(_) | FanError::Http(_) => {
                ErrorSeverity::Warning
            }
            FanError::InvalidSpeedLevel(_) | FanError::InvalidPercentage(_) => {
                ErrorSeverity::Warning
            }
        }
    }

    /// Whether the error originated in the transport/session layer
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            FanError::Connection(_)
                | FanError::Authentication(_)
                | FanError::Timeout(_)
                | FanError::DeviceControl(_)
                | FanError::Http(_)
        )
    }

    /// Check if error is retryable
    ///
    /// The dispatcher itself never retries; the flag is exposed for the host.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FanError::Connection(_) | FanError::Timeout(_) | FanError::Http(_)
        )
    }

    /// Check if error indicates authentication issue
    pub fn is_auth_error(&self) -> bool {
        matches!(self, FanError::Authentication(_))
    }

    /// Get a production-safe error message that doesn't expose sensitive information
    pub fn sanitized_message(&self) -> String {
        #[cfg(debug_assertions)]
        {
            self.to_string()
        }
        #[cfg(not(debug_assertions))]
        {
            match self {
                FanError::InvalidSpeedLevel(name) => format!("Invalid speed level: {name}"),
                FanError::InvalidPercentage(p) => format!("Invalid speed percentage: {p}"),
                FanError::Config(_) => "Configuration error".to_string(),
                FanError::Connection(_) => "Network connection issue".to_string(),
                FanError::Authentication(_) => "Authentication failed".to_string(),
                FanError::Timeout(_) => "Operation timed out".to_string(),
                FanError::DeviceControl(_) => "Device control failed".to_string(),
                FanError::Http(_) => "HTTP request failed".to_string(),
            }
        }
    }
}

/// Error logging utilities
pub struct ErrorReporter;

impl ErrorReporter {
    /// Log an error with the level matching its severity
    pub fn log_error(error: &FanError, operation: &str) {
        let code = error.to_error_code();
        let message = error.sanitized_message();

        match error.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(
                    error_code = code.as_number(),
                    category = code.category(),
                    operation,
                    "Error occurred: {message}"
                );
            }
            ErrorSeverity::Warning => {
                tracing::warn!(
                    error_code = code.as_number(),
                    category = code.category(),
                    operation,
                    "Warning: {message}"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let test_cases = vec![
            (
                FanError::invalid_speed_level("turbo"),
                ErrorCode::InvalidInput,
            ),
            (FanError::InvalidPercentage(120), ErrorCode::InvalidInput),
            (FanError::config("test"), ErrorCode::ConfigurationInvalid),
            (FanError::connection("test"), ErrorCode::ConnectionRefused),
            (
                FanError::authentication("test"),
                ErrorCode::InvalidCredentials,
            ),
            (FanError::timeout("test"), ErrorCode::ConnectionTimeout),
            (
                FanError::device_control("test"),
                ErrorCode::DeviceControlFailed,
            ),
        ];

        for (error, expected_code) in test_cases {
            assert_eq!(error.to_error_code(), expected_code);
        }
    }

    #[test]
    fn test_transport_classification() {
        assert!(FanError::connection("refused").is_transport_error());
        assert!(FanError::authentication("401").is_transport_error());
        assert!(FanError::device_control("500").is_transport_error());
        assert!(!FanError::invalid_speed_level("turbo").is_transport_error());
        assert!(!FanError::config("missing host").is_transport_error());
    }

    #[test]
    fn test_retry_and_auth_flags() {
        assert!(FanError::timeout("slow").is_retryable());
        assert!(!FanError::authentication("bad").is_retryable());
        assert!(FanError::authentication("bad").is_auth_error());
        assert_eq!(
            FanError::authentication("bad").severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ErrorCode::ConnectionTimeout.category(), "connection");
        assert_eq!(ErrorCode::InvalidCredentials.category(), "authentication");
        assert_eq!(ErrorCode::DeviceControlFailed.category(), "device");
        assert_eq!(ErrorCode::InvalidInput.as_number(), 1402);
    }
}
