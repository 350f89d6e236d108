use moviedb_knot::config::{ApiConfig, Config, ConfigError, KnotConfig};
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, content).expect("Failed to write config");
    (temp_dir, path)
}

/// Test that Config::default() produces the expected values.
#[test]
fn test_config_default_values() {
    let config = Config::default();
    assert_eq!(config.knot.bus_capacity, 256);
    assert_eq!(config.knot.broadcast_capacity, 1024);
    assert!(config.api.fixture.is_none());
    assert_eq!(config.api.latency_ms, 0);
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("moviedb-knot/config.toml"));
}

#[test]
fn test_missing_file_yields_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config::load_from(&temp_dir.path().join("absent.toml")).expect("default");
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_full_file() {
    let (_dir, path) = write_config(
        r#"
[knot]
bus_capacity = 8
broadcast_capacity = 32

[api]
fixture = "/tmp/movies.json"
latency_ms = 150
"#,
    );
    let config = Config::load_from(&path).expect("valid config");
    assert_eq!(
        config,
        Config {
            knot: KnotConfig {
                bus_capacity: 8,
                broadcast_capacity: 32,
            },
            api: ApiConfig {
                fixture: Some(PathBuf::from("/tmp/movies.json")),
                latency_ms: 150,
            },
        }
    );
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let (_dir, path) = write_config("[knot]\nbus_capacity = 4\n");
    let config = Config::load_from(&path).expect("valid config");
    assert_eq!(config.knot.bus_capacity, 4);
    assert_eq!(config.knot.broadcast_capacity, 1024);
    assert_eq!(config.api, ApiConfig::default());
}

#[test]
fn test_zero_capacity_fails_validation() {
    let (_dir, path) = write_config("[knot]\nbroadcast_capacity = 0\n");
    let err = Config::load_from(&path).expect_err("zero capacity");
    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("broadcast_capacity"));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let (_dir, path) = write_config("[knot\nbus_capacity = ");
    let err = Config::load_from(&path).expect_err("bad toml");
    assert!(matches!(err, ConfigError::ParseError { .. }));
}
