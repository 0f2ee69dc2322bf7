//! Configuration loading tests: TOML files, environment and CLI overrides

use nrf905_fan::config::{ConfigOverrides, FanConfig};
use nrf905_fan::FanError;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::io::Write;
use std::time::Duration;

const ENV_KEYS: [&str; 7] = [
    "NRF905_NAME",
    "NRF905_HOST",
    "NRF905_USERNAME",
    "NRF905_PASSWORD",
    "NRF905_USE_SSL",
    "NRF905_TIMER",
    "NRF905_TIMEOUT",
];

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(content.as_bytes()).expect("write temp config");
    file
}

#[test]
#[serial]
fn test_load_from_file() {
    let file = write_config(
        r#"
        name = "Office fan"
        host = "10.0.0.7"
        username = "fan"
        password = "s3cret"
        timer = 10
        timeout = "3s"
        "#,
    );

    temp_env::with_vars_unset(ENV_KEYS, || {
        let config = FanConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.name, "Office fan");
        assert_eq!(config.host, "10.0.0.7");
        assert_eq!(config.timer, 10);
        assert_eq!(config.timeout, Duration::from_secs(3));
    });
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let file = write_config(
        r#"
        host = "10.0.0.7"
        username = "fan"
        password = "from-file"
        "#,
    );

    temp_env::with_vars_unset(ENV_KEYS, || {
        temp_env::with_vars(
            [
                ("NRF905_PASSWORD", Some("from-env")),
                ("NRF905_USE_SSL", Some("true")),
            ],
            || {
                let config = FanConfig::load(Some(file.path())).unwrap();

                assert_eq!(config.password, "from-env");
                assert!(config.use_ssl);
                assert_eq!(config.credentials().scheme(), "https");
            },
        );
    });
}

#[test]
#[serial]
fn test_environment_only() {
    temp_env::with_vars_unset(ENV_KEYS, || {
        temp_env::with_vars(
            [
                ("NRF905_HOST", Some("fan.local:8080")),
                ("NRF905_USERNAME", Some("fan")),
                ("NRF905_PASSWORD", Some("s3cret")),
                ("NRF905_TIMER", Some("5")),
            ],
            || {
                let config = FanConfig::load(None).unwrap();

                assert_eq!(config.host, "fan.local:8080");
                assert_eq!(config.timer, 5);
                assert_eq!(config.name, "nrf905");
            },
        );
    });
}

#[test]
#[serial]
fn test_numeric_looking_credentials_stay_verbatim() {
    temp_env::with_vars_unset(ENV_KEYS, || {
        temp_env::with_vars(
            [
                ("NRF905_HOST", Some("fan.local")),
                ("NRF905_USERNAME", Some("007")),
                ("NRF905_PASSWORD", Some("0042")),
                ("NRF905_USE_SSL", Some("true")),
            ],
            || {
                let config = FanConfig::load(None).unwrap();

                assert_eq!(config.username, "007");
                assert_eq!(config.password, "0042");
                assert!(config.use_ssl);
            },
        );
    });
}

#[test]
#[serial]
fn test_overrides_take_precedence() {
    temp_env::with_vars_unset(ENV_KEYS, || {
        temp_env::with_vars(
            [
                ("NRF905_HOST", Some("env-host")),
                ("NRF905_USERNAME", Some("env-user")),
                ("NRF905_PASSWORD", Some("env-pass")),
            ],
            || {
                let overrides = ConfigOverrides {
                    host: Some("cli-host".into()),
                    timer: Some(12),
                    ..ConfigOverrides::default()
                };
                let config = FanConfig::load_with_overrides(None, &overrides).unwrap();

                assert_eq!(config.host, "cli-host");
                assert_eq!(config.username, "env-user");
                assert_eq!(config.timer, 12);
            },
        );
    });
}

#[test]
#[serial]
fn test_no_default_credentials() {
    temp_env::with_vars_unset(ENV_KEYS, || {
        temp_env::with_var("NRF905_HOST", Some("fan.local"), || {
            let result = FanConfig::load(None);
            assert!(matches!(result, Err(FanError::Config(_))));
        });
    });
}

#[test]
#[serial]
fn test_missing_file() {
    temp_env::with_vars_unset(ENV_KEYS, || {
        let result = FanConfig::load(Some(std::path::Path::new("/nonexistent/nrf905.toml")));
        assert!(matches!(result, Err(FanError::Config(_))));
    });
}
