//! Configuration loading from disk and the environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{EdgeConfig, EnvironmentMode};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the config file path.
pub const CONFIG_PATH_VAR: &str = "EDGE_CONFIG";
/// Environment variable overriding the API base URL.
pub const API_BASE_URL_VAR: &str = "API_BASE_URL";
/// Environment variable selecting the environment mode.
pub const ENVIRONMENT_VAR: &str = "EDGE_ENVIRONMENT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<EdgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: EdgeConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the effective configuration: the file named by `EDGE_CONFIG` if
/// set, defaults otherwise, with environment variable overrides applied on
/// top and the result validated.
pub fn build_config() -> Result<EdgeConfig, ConfigError> {
    let mut config = match env::var(CONFIG_PATH_VAR) {
        Ok(path) => load_config(Path::new(&path))?,
        Err(_) => EdgeConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment variable overrides to a loaded configuration.
///
/// `API_BASE_URL` and `EDGE_ENVIRONMENT` take precedence over the file so a
/// deployment can reshape the CSP without shipping a new config.
pub fn apply_env_overrides(config: &mut EdgeConfig) {
    if let Ok(url) = env::var(API_BASE_URL_VAR) {
        config.upstream.api_base_url = url;
    }
    if let Ok(mode) = env::var(ENVIRONMENT_VAR) {
        config.environment = EnvironmentMode::from_env_value(&mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_round_trip() {
        let path = std::env::temp_dir().join("storefront-edge-loader-test.toml");
        fs::write(
            &path,
            r#"
            environment = "production"

            [upstream]
            api_base_url = "https://api.example.com/v1"
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.environment.is_production());
        assert_eq!(config.upstream.api_base_url, "https://api.example.com/v1");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_config_rejects_bad_toml() {
        let path = std::env::temp_dir().join("storefront-edge-loader-bad.toml");
        fs::write(&path, "listener = 42").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let _ = fs::remove_file(&path);
    }
}
