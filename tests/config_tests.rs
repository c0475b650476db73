//! Integration tests for configuration loading and CLI/env layering.

use clap::Parser;
use scangate::cli::{Cli, Commands, ThemeArg};
use scangate::config::{Config, DEFAULT_NODE};
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all SCANGATE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("SCANGATE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = Config {
        store_url: Some("https://gate.example.test".to_string()),
        node: "event_badges".to_string(),
        timeout_secs: 3,
        theme: ThemeArg::Light,
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path);
    assert_eq!(loaded, config);
}

#[test]
fn test_config_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("config.json");

    Config::default().save_to(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_corrupt_config_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ this is not json").unwrap();

    let loaded = Config::load_from(&path);
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"store_url": "https://gate.example.test"}"#).unwrap();

    let loaded = Config::load_from(&path);
    assert_eq!(loaded.store_url.as_deref(), Some("https://gate.example.test"));
    assert_eq!(loaded.node, DEFAULT_NODE);
    assert_eq!(loaded.theme, ThemeArg::Dark);
}

#[test]
fn test_store_url_from_environment() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    std::env::set_var("SCANGATE_STORE_URL", "https://env.example.test");

    let cli = Cli::try_parse_from(["scangate", "check", "CODE-1"]).unwrap();
    match cli.command {
        Commands::Check(args) => {
            assert_eq!(args.store.store_url.as_deref(), Some("https://env.example.test"));
        }
        _ => panic!("expected check subcommand"),
    }

    clear_env();
}

#[test]
fn test_cli_flag_overrides_environment() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    std::env::set_var("SCANGATE_STORE_URL", "https://env.example.test");
    std::env::set_var("SCANGATE_NODE", "env_node");

    let cli = Cli::try_parse_from([
        "scangate",
        "check",
        "CODE-1",
        "--store-url",
        "https://flag.example.test",
    ])
    .unwrap();

    match cli.command {
        Commands::Check(args) => {
            assert_eq!(args.store.store_url.as_deref(), Some("https://flag.example.test"));
            // Untouched by the flag, still from the environment.
            assert_eq!(args.store.node.as_deref(), Some("env_node"));
        }
        _ => panic!("expected check subcommand"),
    }

    clear_env();
}

#[test]
fn test_theme_serde_names_are_lowercase() {
    assert_eq!(serde_json::to_string(&ThemeArg::Dark).unwrap(), r#""dark""#);
    assert_eq!(
        serde_json::from_str::<ThemeArg>(r#""light""#).unwrap(),
        ThemeArg::Light
    );
}
