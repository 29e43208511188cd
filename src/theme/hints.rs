//! Edge-side theme negotiation.
//!
//! The theme cookie exists so server-rendered markup can match the client's
//! eventual theme. This middleware closes that loop at the edge: it reads
//! the persisted preference from the `Cookie` header, the OS signal from
//! the `Sec-CH-Prefers-Color-Scheme` client hint, resolves the theme with
//! the same pure function the store uses, and forwards it as `x-theme` so
//! the renderer can stamp `data-theme` on the document root.

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{COOKIE, VARY},
        HeaderValue, Request,
    },
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;
use crate::security::headers::is_exempt;
use crate::theme::persistence::preference_from_cookie_header;
use crate::theme::preference::{resolve, ColorScheme};

/// Request header carrying the resolved theme to the rendering backend.
pub const X_THEME: &str = "x-theme";

/// Client hint advertising the OS color scheme.
pub const PREFERS_COLOR_SCHEME: &str = "sec-ch-prefers-color-scheme";

/// Response header asking browsers to send the hint.
const ACCEPT_CH: &str = "accept-ch";

/// Parse the client hint value; absent or unknown reads as light, matching
/// the browser default. Browsers send the value as a structured-header
/// string, so it arrives quoted.
pub fn scheme_from_hint(value: Option<&str>) -> ColorScheme {
    match value {
        Some(v) if v.trim().trim_matches('"').eq_ignore_ascii_case("dark") => ColorScheme::Dark,
        _ => ColorScheme::Light,
    }
}

/// Middleware resolving the per-request theme for the renderer.
pub async fn negotiate_theme(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let policy = state.policy.load_full();

    let preference = request
        .headers()
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| preference_from_cookie_header(h, &policy.theme_cookie))
        .unwrap_or_default();

    let os_scheme = scheme_from_hint(
        request
            .headers()
            .get(PREFERS_COLOR_SCHEME)
            .and_then(|h| h.to_str().ok()),
    );

    let resolved = resolve(preference, os_scheme);
    request
        .headers_mut()
        .insert(X_THEME, HeaderValue::from_static(resolved.as_str()));

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        ACCEPT_CH,
        HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"),
    );
    headers.append(VARY, HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_parsing() {
        assert_eq!(scheme_from_hint(Some("\"dark\"")), ColorScheme::Dark);
        assert_eq!(scheme_from_hint(Some("dark")), ColorScheme::Dark);
        assert_eq!(scheme_from_hint(Some("DARK")), ColorScheme::Dark);
        assert_eq!(scheme_from_hint(Some("light")), ColorScheme::Light);
        assert_eq!(scheme_from_hint(None), ColorScheme::Light);
    }
}
