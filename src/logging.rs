//! Logging setup
//!
//! Events go to stderr and, when `NRF905_LOG_FILE` is set, to a daily
//! rotated log file. `RUST_LOG` overrides the default level and
//! `NRF905_LOG_THREAD_IDS=true` adds thread IDs to every line.

use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: Level,

    /// Log to file
    pub file_path: Option<PathBuf>,

    /// Log to stderr
    pub stderr: bool,

    /// Include thread IDs
    pub thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_path: None,
            stderr: true,
            thread_ids: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(log_file) = std::env::var("NRF905_LOG_FILE") {
            if !log_file.trim().is_empty() {
                config.file_path = Some(PathBuf::from(log_file));
            }
        }

        if let Ok(log_stderr) = std::env::var("NRF905_LOG_STDERR") {
            config.stderr = log_stderr.to_lowercase() != "false";
        }

        if let Ok(thread_ids) = std::env::var("NRF905_LOG_THREAD_IDS") {
            config.thread_ids = matches!(thread_ids.to_lowercase().as_str(), "1" | "true");
        }

        config
    }

    /// Raise the default level to DEBUG
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        if debug {
            self.level = Level::DEBUG;
        }
        self
    }
}

/// Initialize logging with the given configuration
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(config.thread_ids)
    });

    let file_layer = match &config.file_path {
        Some(file_path) => {
            let directory = file_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            std::fs::create_dir_all(directory)?;

            let file_appender = tracing_appender::rolling::daily(
                directory,
                file_path
                    .file_name()
                    .unwrap_or_else(|| std::ffi::OsStr::new("nrf905-fan.log")),
            );

            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(config.thread_ids),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
