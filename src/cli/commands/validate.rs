//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Signalveil configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing, so a successful load means
        // the configuration is usable as-is
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level:       {}", config.application.log_level);
        println!("  Default Tenant:  {}", config.application.default_tenant);
        println!("  Locale:          {}", config.detection.locale);
        println!(
            "  Pattern Library: {}",
            config
                .detection
                .pattern_library
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "embedded default".to_string())
        );
        println!("  Escrow Key:      configured (32 bytes)");
        println!(
            "  Database:        postgresql://***@{}",
            config
                .database
                .connection_string
                .split('@')
                .next_back()
                .unwrap_or("***")
        );
        println!("  Max Connections: {}", config.database.max_connections);
        println!("  Analyzer:        {}", config.analyzer.base_url);
        println!("  Analyzer Model:  {}", config.analyzer.model);
        println!(
            "  Analyzer Timeout: {}s (local fallback after)",
            config.analyzer.timeout_seconds
        );
        println!();
        Ok(0)
    }
}
