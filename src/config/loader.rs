//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{Locale, SignalveilConfig};
use crate::config::secret_string;
use crate::domain::errors::SignalveilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`SignalveilConfig`]
/// 4. Applies environment variable overrides (`SIGNALVEIL_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a `Configuration` error if the file cannot be read, parsing
/// fails, a referenced environment variable is unset, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<SignalveilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SignalveilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SignalveilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SignalveilConfig = toml::from_str(&contents)
        .map_err(|e| SignalveilError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SignalveilError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are passed through untouched. Referencing an unset
/// variable is an error so secrets never silently default to the literal
/// placeholder.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SignalveilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `SIGNALVEIL_*` prefix
fn apply_env_overrides(config: &mut SignalveilConfig) {
    if let Ok(val) = std::env::var("SIGNALVEIL_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("SIGNALVEIL_DEFAULT_TENANT") {
        config.application.default_tenant = val;
    }

    if let Ok(val) = std::env::var("SIGNALVEIL_LOCALE") {
        match val.as_str() {
            "de-at" => config.detection.locale = Locale::DeAt,
            "en" => config.detection.locale = Locale::En,
            other => {
                tracing::warn!(locale = other, "Ignoring unknown SIGNALVEIL_LOCALE override")
            }
        }
    }
    if let Ok(val) = std::env::var("SIGNALVEIL_PATTERN_LIBRARY") {
        config.detection.pattern_library = Some(val.into());
    }

    if let Ok(val) = std::env::var("SIGNALVEIL_ENCRYPTION_KEY") {
        config.vault.encryption_key = secret_string(val);
    }

    if let Ok(val) = std::env::var("SIGNALVEIL_DATABASE_URL") {
        config.database.connection_string = val;
    }

    if let Ok(val) = std::env::var("SIGNALVEIL_ANALYZER_URL") {
        config.analyzer.base_url = val;
    }
    if let Ok(val) = std::env::var("SIGNALVEIL_ANALYZER_MODEL") {
        config.analyzer.model = val;
    }
    if let Ok(val) = std::env::var("SIGNALVEIL_ANALYZER_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.analyzer.timeout_seconds = secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_known_var() {
        std::env::set_var("SIGNALVEIL_TEST_SUB_VAR", "resolved");
        let out = substitute_env_vars("value = \"${SIGNALVEIL_TEST_SUB_VAR}\"").unwrap();
        assert!(out.contains("resolved"));
        std::env::remove_var("SIGNALVEIL_TEST_SUB_VAR");
    }

    #[test]
    fn test_substitute_missing_var_fails() {
        let result = substitute_env_vars("value = \"${SIGNALVEIL_DEFINITELY_UNSET_VAR}\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_comment_lines_skipped() {
        let out = substitute_env_vars("# uses ${SIGNALVEIL_DEFINITELY_UNSET_VAR}\nkey = 1").unwrap();
        assert!(out.contains("${SIGNALVEIL_DEFINITELY_UNSET_VAR}"));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let result = load_config("/nonexistent/signalveil.toml");
        assert!(matches!(
            result,
            Err(SignalveilError::Configuration(_))
        ));
    }
}
