//! Configuration management for Signalveil
//!
//! Configuration is loaded from a TOML file with `${VAR}` environment
//! substitution, then overridden by `SIGNALVEIL_*` environment variables,
//! then validated. Secrets are wrapped in [`SecretString`] / [`SecretKey`].

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    AnalyzerConfig, ApplicationConfig, DatabaseConfig, DetectionConfig, Environment, Locale,
    LoggingConfig, SignalveilConfig, VaultConfig,
};
pub use secret::{secret_string, KeyBytes, SecretKey, SecretString, SecretValue};
