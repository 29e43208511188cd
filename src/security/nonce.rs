//! Per-request CSP nonce generation.

use std::fmt;
use std::fmt::Write;

use axum::http::HeaderValue;
use rand::Rng;

/// Request header carrying the nonce to the rendering backend.
pub const X_NONCE: &str = "x-nonce";

/// A single-use random token permitting specific inline scripts.
///
/// 16 bytes from a cryptographically secure source, hex-encoded to exactly
/// 32 lowercase characters. Generated fresh for every request and never
/// reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    /// Generate a new random nonce.
    pub fn generate() -> Self {
        let bytes: [u8; 16] = rand::thread_rng().gen();
        let mut encoded = String::with_capacity(32);
        for byte in bytes {
            let _ = write!(encoded, "{byte:02x}");
        }
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The nonce as a header value. Hex is always valid ASCII.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&self.0).expect("hex nonce is a valid header value")
    }

    /// The `'nonce-<value>'` source token for CSP directives.
    pub fn csp_token(&self) -> String {
        format!("'nonce-{}'", self.0)
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_is_32_lowercase_hex() {
        let nonce = Nonce::generate();
        assert_eq!(nonce.as_str().len(), 32);
        assert!(nonce
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_sequential_nonces_differ() {
        let a = Nonce::generate();
        let b = Nonce::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_csp_token_wraps_value() {
        let nonce = Nonce::generate();
        assert_eq!(nonce.csp_token(), format!("'nonce-{}'", nonce.as_str()));
    }
}
