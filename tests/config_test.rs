//! Tests for server configuration loading.

use std::fs;
use tempfile::TempDir;
use tictactoe_arena::ServerConfig;

#[test]
fn test_defaults() {
    let config = ServerConfig::default();
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(*config.port(), 3000);
    assert_eq!(*config.max_name_len(), 40);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("server.toml");
    fs::write(&path, "port = 4000\n").expect("Write failed");

    let config = ServerConfig::from_file(&path).expect("Load failed");
    assert_eq!(*config.port(), 4000);
    assert_eq!(config.host(), "127.0.0.1");
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = ServerConfig::load_or_default(dir.path().join("absent.toml")).expect("Load failed");
    assert_eq!(config, ServerConfig::default());
}

#[test]
fn test_invalid_file_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "port = \"not a number\"").expect("Write failed");

    let err = ServerConfig::load_or_default(&path).unwrap_err();
    assert!(err.message.starts_with("Failed to parse config"));
}

#[test]
fn test_overrides() {
    let config = ServerConfig::default().with_overrides(Some("0.0.0.0".to_string()), None);
    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.port(), 3000);
}
