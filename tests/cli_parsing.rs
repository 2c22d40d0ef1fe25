//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

use usher::cli::{Cli, Commands};

#[test]
fn test_parse_up_with_overrides() {
    let cli = Cli::try_parse_from(vec![
        "usher",
        "up",
        "--port",
        "9000",
        "--health-attempts",
        "5",
    ])
    .unwrap();

    match cli.command {
        Commands::Up(args) => {
            assert_eq!(args.port, Some(9000));
            assert_eq!(args.health_attempts, Some(5));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_up_defaults() {
    let cli = Cli::try_parse_from(vec!["usher", "up"]).unwrap();

    assert!(!cli.json);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Up(args) => {
            assert_eq!(args.port, None);
            assert_eq!(args.health_attempts, None);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(vec![
        "usher",
        "preflight",
        "--json",
        "--config",
        "/etc/usher/config.yaml",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("/etc/usher/config.yaml")));
    assert!(matches!(cli.command, Commands::Preflight(_)));
}

#[test]
fn test_parse_config_command() {
    let cli = Cli::try_parse_from(vec!["usher", "config"]).unwrap();
    assert!(matches!(cli.command, Commands::Config(_)));
}

#[test]
fn test_missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(vec!["usher"]).is_err());
}

#[test]
fn test_unknown_flag_is_an_error() {
    assert!(Cli::try_parse_from(vec!["usher", "up", "--bogus"]).is_err());
}
