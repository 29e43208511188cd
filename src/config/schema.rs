//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! gateway. All types derive Serde traits for deserialization from config
//! files, and every section has a usable default so a minimal (or absent)
//! config file still yields a runnable service.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream targets: rendering backend and API base URL.
    pub upstream: UpstreamConfig,

    /// Environment mode. Branches CSP directive content and HSTS.
    pub environment: EnvironmentMode,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Security hardening settings.
    pub security: SecurityConfig,

    /// Theme negotiation settings.
    pub theme: ThemeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Address of the rendering backend (host:port).
    pub render_address: String,

    /// Base URL of the storefront API. Only its origin is used, and only
    /// to build the CSP connect-src directive.
    pub api_base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            render_address: "127.0.0.1:3000".to_string(),
            api_base_url: "http://localhost:8000/api/v1".to_string(),
        }
    }
}

/// Deployment environment.
///
/// Production tightens the CSP (no unsafe-eval, no plain websocket schemes)
/// and enables HSTS; anything else is treated as a development environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    Production,
    #[default]
    Development,
}

impl EnvironmentMode {
    pub fn is_production(self) -> bool {
        matches!(self, EnvironmentMode::Production)
    }

    /// Parse an environment string the way deployment platforms spell it:
    /// exactly "production" means production, everything else does not.
    pub fn from_env_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            EnvironmentMode::Production
        } else {
            EnvironmentMode::Development
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Theme negotiation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Name of the cookie mirroring the persisted theme preference.
    pub cookie_name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            cookie_name: "theme".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when RUST_LOG is not set.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "storefront_edge=info,tower_http=warn".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_documented_defaults() {
        let config = EdgeConfig::default();
        assert_eq!(config.upstream.api_base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.upstream.render_address, "127.0.0.1:3000");
        assert_eq!(config.environment, EnvironmentMode::Development);
        assert_eq!(config.theme.cookie_name, "theme");
    }

    #[test]
    fn test_minimal_toml_uses_section_defaults() {
        let config: EdgeConfig = toml::from_str(
            r#"
            environment = "production"

            [listener]
            bind_address = "127.0.0.1:9999"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");
        assert!(config.environment.is_production());
        // Untouched sections fall back to defaults.
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.security.max_body_size, 2 * 1024 * 1024);
    }

    #[test]
    fn test_environment_from_env_value() {
        assert!(EnvironmentMode::from_env_value("production").is_production());
        assert!(EnvironmentMode::from_env_value("PRODUCTION").is_production());
        assert!(!EnvironmentMode::from_env_value("development").is_production());
        assert!(!EnvironmentMode::from_env_value("staging").is_production());
        assert!(!EnvironmentMode::from_env_value("").is_production());
    }
}
