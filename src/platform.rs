//! Platform setup: turns a validated configuration into a registered entity

use crate::client::http_client::HttpTransport;
use crate::config::FanConfig;
use crate::error::Result;
use crate::fan::entity::Nrf905Fan;
use tracing::info;

/// Build the HTTP transport described by `config`
pub fn transport_for(config: &FanConfig) -> HttpTransport {
    HttpTransport::new(config.timeout).accept_invalid_certs(!config.verify_ssl)
}

/// Create the fan for `config` and hand it to the host's `add_entities`
///
/// Fails before anything is registered if the configuration is invalid.
pub fn setup_platform<F>(config: &FanConfig, add_entities: F) -> Result<()>
where
    F: FnOnce(Vec<Nrf905Fan<HttpTransport>>),
{
    let fan = Nrf905Fan::from_config(config, transport_for(config))?;
    info!("Setting up nRF905 fan '{}' at {}", config.name, config.host);

    add_entities(vec![fan]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FanError;
    use crate::fan::entity::FanEntity;

    #[test]
    fn test_setup_registers_one_entity() {
        let mut config = FanConfig::new("fan.local", "fan", "s3cret");
        config.name = "Living room".into();
        config.timer = 5;

        let mut registered = Vec::new();
        setup_platform(&config, |entities| registered.extend(entities)).unwrap();

        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].name(), "Living room");
        assert_eq!(registered[0].timer(), 5);
        assert_eq!(registered[0].is_on(), None);
        assert!(!registered[0].should_poll());
    }

    #[test]
    fn test_setup_rejects_invalid_config() {
        let config = FanConfig::new("fan.local", "fan", "");

        let mut called = false;
        let result = setup_platform(&config, |_| called = true);

        assert!(matches!(result, Err(FanError::Config(_))));
        assert!(!called);
    }
}
