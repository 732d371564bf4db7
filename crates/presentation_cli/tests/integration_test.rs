//! Integration tests for CLI
//!
//! These tests verify command parsing and configuration layering without
//! touching the network.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

use std::ffi::OsString;
use std::io::Write;

use clap::Parser;
use infrastructure::AppConfig;
use methu_cli::{Cli, Commands};

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
    Cli::try_parse_from(os_args)
}

#[test]
fn cli_parses_resolve_command() {
    let cli = parse_args(&["methu-cli", "resolve", "Kecskemét"]).unwrap();
    if let Commands::Resolve { name } = cli.command {
        assert_eq!(name, "Kecskemét");
    } else {
        panic!("Expected Resolve command");
    }
}

#[test]
fn cli_resolve_requires_name() {
    assert!(parse_args(&["methu-cli", "resolve"]).is_err());
}

#[test]
fn cli_parses_forecast_with_settlement_and_json() {
    let cli = parse_args(&["methu-cli", "forecast", "--settlement", "Szeged", "--json"]).unwrap();
    if let Commands::Forecast { location, json } = cli.command {
        assert_eq!(location.settlement.as_deref(), Some("Szeged"));
        assert!(location.code.is_none());
        assert!(json);
    } else {
        panic!("Expected Forecast command");
    }
}

#[test]
fn cli_parses_manual_location() {
    let cli = parse_args(&[
        "methu-cli",
        "sensors",
        "-s",
        "Pécs",
        "--code",
        "23456",
        "--lat",
        "46.07",
        "--lon",
        "18.23",
    ])
    .unwrap();
    if let Commands::Sensors { location, json } = cli.command {
        assert_eq!(location.code.as_deref(), Some("23456"));
        assert_eq!(location.lat, Some(46.07));
        assert_eq!(location.lon, Some(18.23));
        assert!(!json);
    } else {
        panic!("Expected Sensors command");
    }
}

#[test]
fn cli_code_requires_coordinates() {
    assert!(parse_args(&["methu-cli", "forecast", "--code", "23456"]).is_err());
    assert!(parse_args(&["methu-cli", "forecast", "--code", "1", "--lat", "46.0"]).is_err());
}

#[test]
fn cli_coordinates_require_code() {
    assert!(parse_args(&["methu-cli", "forecast", "--lat", "46.0", "--lon", "18.0"]).is_err());
}

#[test]
fn cli_counts_verbosity_anywhere() {
    let cli = parse_args(&["methu-cli", "-vv", "watch"]).unwrap();
    assert_eq!(cli.verbose, 2);

    let cli = parse_args(&["methu-cli", "watch", "-v"]).unwrap();
    assert_eq!(cli.verbose, 1);
    assert!(matches!(cli.command, Commands::Watch { .. }));
}

#[test]
fn cli_accepts_config_path() {
    let cli = parse_args(&["methu-cli", "--config", "/etc/methu.toml", "watch"]).unwrap();
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/etc/methu.toml"))
    );
}

#[test]
fn cli_rejects_unknown_command() {
    assert!(parse_args(&["methu-cli", "unknown"]).is_err());
}

#[test]
fn flags_override_config_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(b"[location]\nsettlement = \"Debrecen\"\n[update]\ninterval_minutes = 10\n")
        .unwrap();

    let cli = parse_args(&["methu-cli", "forecast", "--settlement", "Miskolc"]).unwrap();
    let Commands::Forecast { location, .. } = &cli.command else {
        panic!("Expected Forecast command");
    };

    let mut config = AppConfig::read_from(Some(file.path())).unwrap();
    location.apply(&mut config);

    assert_eq!(config.location.settlement, "Miskolc");
    assert!(config.validate().is_ok());
    assert_eq!(
        config.update.effective_interval(),
        std::time::Duration::from_secs(30 * 60)
    );
}
