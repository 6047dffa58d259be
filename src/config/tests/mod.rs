//! Unit tests for config module
//!
//! Tests configuration types, defaults, and serialization.
//! No filesystem dependencies - all in-memory.

#![allow(clippy::unwrap_used)]

use crate::config::{Config, LogLevel, WatchConfig};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert!(config.watch.ignored_players.is_empty());
    assert!(!config.watch.log_to_file);
}

#[test]
fn config_serialize_toml() {
    let toml_str = Config::default().to_toml().unwrap();

    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("log_level = \"info\""));
    assert!(toml_str.contains("[watch]"));
}

#[test]
fn config_deserialize_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [watch]
        ignored_players = ["chromium", "firefox"]
        log_to_file = true
    "#;

    let config = Config::from_toml(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(
        config.watch,
        WatchConfig {
            ignored_players: vec!["chromium".to_string(), "firefox".to_string()],
            log_to_file: true,
        }
    );
}

#[test]
fn config_serialize_roundtrip() {
    let original = Config {
        watch: WatchConfig {
            ignored_players: vec!["kdeconnect".to_string()],
            log_to_file: false,
        },
        ..Config::default()
    };

    let deserialized = Config::from_toml(&original.to_toml().unwrap()).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn config_empty_toml() {
    assert_eq!(Config::from_toml("").unwrap(), Config::default());
}

#[test]
fn config_partial_section() {
    let config = Config::from_toml("[watch]\nlog_to_file = true\n").unwrap();

    assert!(config.watch.log_to_file);
    assert!(config.watch.ignored_players.is_empty());
    assert_eq!(config.general.log_level, LogLevel::Info);
}

#[test]
fn config_invalid_toml() {
    let invalid_toml = r#"
        [general
        invalid syntax here
    "#;

    assert!(Config::from_toml(invalid_toml).is_err());
}

#[test]
fn config_invalid_log_level() {
    assert!(Config::from_toml("[general]\nlog_level = \"loud\"\n").is_err());
}

#[test]
fn config_unknown_fields() {
    let toml_with_unknown = r#"
        [general]
        log_level = "warn"
        unknown_field = "should be ignored"

        [unknown_section]
        some_field = "ignored"
    "#;

    let config = Config::from_toml(toml_with_unknown).unwrap();
    assert_eq!(config.general.log_level, LogLevel::Warn);
}

#[test]
fn schema_describes_sections() {
    let schema = Config::schema_json().unwrap();

    assert!(schema.contains("\"general\""));
    assert!(schema.contains("\"watch\""));
    assert!(schema.contains("ignored_players"));
}
