//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Signalveil using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Signalveil - Privacy-first feedback ingestion
#[derive(Parser, Debug)]
#[command(name = "signalveil")]
#[command(version, about, long_about = None)]
#[command(author = "Signalveil Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "signalveil.toml", env = "SIGNALVEIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SIGNALVEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest one feedback item through the anonymization pipeline
    Ingest(commands::ingest::IngestArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show per-tenant store counts and collaborator health
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_ingest() {
        let cli = Cli::parse_from(["signalveil", "ingest", "--content", "hello"]);
        assert_eq!(cli.config, "signalveil.toml");
        assert!(matches!(cli.command, Commands::Ingest(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from([
            "signalveil",
            "--config",
            "custom.toml",
            "ingest",
            "--content",
            "hello",
        ]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["signalveil", "--log-level", "debug", "status"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["signalveil", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["signalveil", "status"]);
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["signalveil", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
