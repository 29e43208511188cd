//! Content-Security-Policy assembly.
//!
//! The static inputs (API origin, environment) are resolved once per config
//! load into a [`CspConfig`]; only the nonce-bearing header string is built
//! per request.

use url::{Origin, Url};

use crate::config::EdgeConfig;
use crate::security::nonce::Nonce;

/// Origin substituted when the configured API base URL does not parse.
pub const DEFAULT_API_ORIGIN: &str = "http://localhost:8000";

/// Origins the payment SDK loads scripts from.
pub const PAYMENT_SDK_ORIGINS: [&str; 2] =
    ["https://js.stripe.com", "https://checkout.stripe.com"];

/// Origin the payment SDK calls out to.
pub const PAYMENT_API_ORIGIN: &str = "https://api.stripe.com";

/// Origins the payment SDK embeds frames from.
pub const PAYMENT_FRAME_ORIGINS: [&str; 2] =
    ["https://js.stripe.com", "https://hooks.stripe.com"];

/// Static CSP inputs, resolved once at startup or config reload.
#[derive(Debug, Clone)]
pub struct CspConfig {
    api_origin: String,
    production: bool,
}

impl CspConfig {
    /// Resolve the CSP inputs from configuration.
    ///
    /// A malformed API base URL must not take the storefront down: it
    /// degrades to [`DEFAULT_API_ORIGIN`] with a warning.
    pub fn new(api_base_url: &str, production: bool) -> Self {
        let api_origin = match resolve_origin(api_base_url) {
            Some(origin) => origin,
            None => {
                tracing::warn!(
                    api_base_url,
                    fallback = DEFAULT_API_ORIGIN,
                    "API base URL did not parse to an origin, using fallback"
                );
                DEFAULT_API_ORIGIN.to_string()
            }
        };

        Self {
            api_origin,
            production,
        }
    }

    pub fn from_config(config: &EdgeConfig) -> Self {
        Self::new(
            &config.upstream.api_base_url,
            config.environment.is_production(),
        )
    }

    pub fn api_origin(&self) -> &str {
        &self.api_origin
    }

    pub fn production(&self) -> bool {
        self.production
    }

    /// Assemble the full Content-Security-Policy header value around the
    /// given per-request nonce.
    pub fn header_value(&self, nonce: &Nonce) -> String {
        let mut script_src = vec!["'self'".to_string(), nonce.csp_token()];
        script_src.extend(PAYMENT_SDK_ORIGINS.iter().map(|s| s.to_string()));
        if !self.production {
            // Developer tooling evals bundles on the fly.
            script_src.push("'unsafe-eval'".to_string());
        }

        let mut connect_src = vec![
            "'self'".to_string(),
            PAYMENT_API_ORIGIN.to_string(),
            self.api_origin.clone(),
        ];
        if !self.production {
            connect_src.push("ws:".to_string());
            connect_src.push("wss:".to_string());
        }

        let directives = [
            "default-src 'self'".to_string(),
            format!("script-src {}", script_src.join(" ")),
            "style-src 'self' 'unsafe-inline'".to_string(),
            "font-src 'self' data:".to_string(),
            "img-src 'self' blob: data: https:".to_string(),
            format!("connect-src {}", connect_src.join(" ")),
            format!("frame-src 'self' {}", PAYMENT_FRAME_ORIGINS.join(" ")),
            "object-src 'none'".to_string(),
            "base-uri 'self'".to_string(),
            "form-action 'self'".to_string(),
            "frame-ancestors 'none'".to_string(),
        ];

        directives.join("; ")
    }
}

/// Parse a URL down to its ASCII origin, e.g.
/// `https://api.example.com/v1` → `https://api.example.com`.
fn resolve_origin(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    match url.origin() {
        Origin::Tuple(..) => Some(url.origin().ascii_serialization()),
        Origin::Opaque(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive<'a>(csp: &'a str, name: &str) -> &'a str {
        csp.split("; ")
            .find(|d| d.starts_with(name))
            .unwrap_or_else(|| panic!("missing directive {name}"))
    }

    #[test]
    fn test_api_origin_resolved_from_base_url() {
        let csp = CspConfig::new("https://api.example.com/v1", true);
        assert_eq!(csp.api_origin(), "https://api.example.com");

        let header = csp.header_value(&Nonce::generate());
        let connect = directive(&header, "connect-src");
        assert_eq!(connect.matches("https://api.example.com").count(), 1);
    }

    #[test]
    fn test_malformed_url_falls_back_to_default_origin() {
        let csp = CspConfig::new("not a url", true);
        assert_eq!(csp.api_origin(), DEFAULT_API_ORIGIN);
    }

    #[test]
    fn test_script_src_contains_exactly_one_nonce_token() {
        let csp = CspConfig::new("http://localhost:8000/api/v1", true);
        let nonce = Nonce::generate();
        let header = csp.header_value(&nonce);

        let script = directive(&header, "script-src");
        assert_eq!(header.matches("'nonce-").count(), 1);
        assert!(script.contains(&nonce.csp_token()));
    }

    #[test]
    fn test_production_drops_dev_allowances() {
        let nonce = Nonce::generate();
        let prod = CspConfig::new("http://localhost:8000/api/v1", true).header_value(&nonce);
        assert!(!prod.contains("'unsafe-eval'"));
        assert!(!directive(&prod, "connect-src").contains("ws:"));

        let dev = CspConfig::new("http://localhost:8000/api/v1", false).header_value(&nonce);
        assert!(directive(&dev, "script-src").contains("'unsafe-eval'"));
        let connect = directive(&dev, "connect-src");
        assert!(connect.contains("ws:"));
        assert!(connect.contains("wss:"));
    }

    #[test]
    fn test_directive_order_is_stable() {
        let header =
            CspConfig::new("http://localhost:8000/api/v1", true).header_value(&Nonce::generate());
        let names: Vec<&str> = header
            .split("; ")
            .map(|d| d.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(
            names,
            [
                "default-src",
                "script-src",
                "style-src",
                "font-src",
                "img-src",
                "connect-src",
                "frame-src",
                "object-src",
                "base-uri",
                "form-action",
                "frame-ancestors",
            ]
        );
    }
}
