//! nRF905 fan command line entry point
//!
//! Builds one fan entity from configuration and runs a single command
//! against the bridge.

use anyhow::Context;
use clap::{Parser, Subcommand};
use nrf905_fan::{
    config::ConfigOverrides,
    fan::FanEntity,
    logging::{init_logging, LogConfig},
    platform, FanConfig,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// nRF905 fan controller
#[derive(Parser, Debug)]
#[command(name = "nrf905-fan")]
#[command(about = "Control a fan behind an nRF905 HTTP bridge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    action: FanAction,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "NRF905_CONFIG")]
    config: Option<PathBuf>,

    /// Entity display name
    #[arg(long, global = true)]
    name: Option<String>,

    /// Bridge host, optionally with port
    #[arg(long, global = true)]
    host: Option<String>,

    /// Bridge username
    #[arg(long, global = true)]
    username: Option<String>,

    /// Bridge password
    #[arg(long, global = true)]
    password: Option<String>,

    /// Talk HTTPS to the bridge
    #[arg(long, global = true)]
    ssl: bool,

    /// Timer value sent with the command
    #[arg(long, global = true)]
    timer: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum FanAction {
    /// Turn the fan on (full speed unless a preset or percentage is given)
    On {
        /// Speed percentage (0-100)
        #[arg(long)]
        percentage: Option<u32>,

        /// Preset mode (low, medium, high)
        #[arg(long, conflicts_with = "percentage")]
        preset: Option<String>,
    },
    /// Turn the fan off
    Off,
    /// Set a preset mode
    Preset {
        /// low, medium or high
        mode: String,
    },
    /// Set the speed percentage
    Percentage {
        /// 0-100, 0 turns the fan off
        value: u32,
    },
    /// Print the entity description as JSON
    Status,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            name: self.name.clone(),
            host: self.host.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            use_ssl: self.ssl.then_some(true),
            timer: self.timer,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LogConfig::from_env().with_debug(cli.debug))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let config = FanConfig::load_with_overrides(cli.config.as_deref(), &cli.overrides())
        .map_err(|e| anyhow::anyhow!(e.sanitized_message()))
        .context("Loading nRF905 fan configuration")?;

    let mut entities = Vec::new();
    platform::setup_platform(&config, |fans| entities.extend(fans))
        .map_err(|e| anyhow::anyhow!(e.sanitized_message()))?;
    let fan = entities
        .pop()
        .context("Platform setup registered no entity")?;

    let result = match &cli.action {
        FanAction::On { percentage, preset } => fan.turn_on(*percentage, preset.as_deref()).await,
        FanAction::Off => fan.turn_off().await,
        FanAction::Preset { mode } => fan.set_preset_mode(mode).await,
        FanAction::Percentage { value } => fan.set_percentage(*value).await,
        FanAction::Status => {
            let status = json!({
                "name": fan.name(),
                "host": config.host,
                "icon": fan.icon(),
                "speed_count": fan.speed_count(),
                "preset_modes": fan.preset_modes(),
                "supported_features": fan.supported_features(),
                "should_poll": fan.should_poll(),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }
    };

    result.map_err(|e| anyhow::anyhow!(e.sanitized_message()))?;
    info!("Done: {:?}", fan.state());
    Ok(())
}
