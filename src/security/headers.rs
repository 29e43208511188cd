//! Security header pipeline middleware.
//!
//! Runs on every page request before it reaches the rendering backend:
//! generates the per-request nonce, propagates it forward as `x-nonce`, and
//! decorates the outgoing response with the CSP and the fixed security
//! header set. Static asset paths bypass the pipeline entirely.

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{CONTENT_SECURITY_POLICY, STRICT_TRANSPORT_SECURITY},
        HeaderValue, Request,
    },
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;
use crate::security::nonce::{Nonce, X_NONCE};

/// Headers attached to every pipeline response regardless of environment.
const SECURITY_HEADERS: [(&str, &str); 6] = [
    ("X-Frame-Options", "DENY"),
    ("X-Content-Type-Options", "nosniff"),
    ("Referrer-Policy", "strict-origin-when-cross-origin"),
    ("X-DNS-Prefetch-Control", "on"),
    (
        "Permissions-Policy",
        "camera=(), microphone=(), geolocation=(), payment=()",
    ),
    ("X-XSS-Protection", "0"),
];

/// HSTS value attached in production only.
const HSTS_VALUE: &str = "max-age=63072000; includeSubDomains; preload";

/// Path prefixes served as cacheable static content, exempt from the
/// pipeline to avoid per-request header work on assets.
const EXEMPT_PREFIXES: [&str; 2] = ["/static/", "/images/"];

/// Returns true for paths the pipeline must not process.
pub fn is_exempt(path: &str) -> bool {
    path == "/favicon.ico" || EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Middleware enforcing the baseline security posture per request.
pub async fn security_headers(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let policy = state.policy.load_full();
    let nonce = Nonce::generate();
    request.headers_mut().insert(X_NONCE, nonce.header_value());

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    if policy.production {
        headers.insert(STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(HSTS_VALUE));
    }

    // Rebuilt per request: the policy embeds the nonce.
    let csp = policy.csp.header_value(&nonce);
    if let Ok(value) = HeaderValue::from_str(&csp) {
        headers.insert(CONTENT_SECURITY_POLICY, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arc_swap::ArcSwap;
    use axum::{middleware, routing::get, Router};
    use hyper_util::{
        client::legacy::{connect::HttpConnector, Client},
        rt::TokioExecutor,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::{EdgeConfig, EnvironmentMode};
    use crate::http::server::EdgePolicy;

    fn test_state(environment: EnvironmentMode) -> AppState {
        let mut config = EdgeConfig::default();
        config.environment = environment;
        AppState {
            policy: Arc::new(ArcSwap::from_pointee(EdgePolicy::from_config(&config))),
            client: Client::builder(TokioExecutor::new()).build(HttpConnector::new()),
        }
    }

    /// Handler echoing the propagated nonce so tests can compare it with
    /// the CSP token.
    async fn echo_nonce(request: Request<Body>) -> String {
        request
            .headers()
            .get(X_NONCE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    fn app(environment: EnvironmentMode) -> Router {
        Router::new()
            .route("/", get(echo_nonce))
            .route("/favicon.ico", get(echo_nonce))
            .layer(middleware::from_fn_with_state(
                test_state(environment),
                security_headers,
            ))
    }

    #[tokio::test]
    async fn test_middleware_attaches_csp_matching_the_propagated_nonce() {
        let response = app(EnvironmentMode::Development)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let csp = response
            .headers()
            .get("content-security-policy")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(response.headers().get("x-frame-options").is_some());
        assert!(response.headers().get("strict-transport-security").is_none());

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let nonce = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(nonce.len(), 32);
        assert!(csp.contains(&format!("'nonce-{nonce}'")));
    }

    #[tokio::test]
    async fn test_middleware_adds_hsts_in_production_only() {
        let response = app(EnvironmentMode::Production)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get("strict-transport-security")
                .unwrap(),
            "max-age=63072000; includeSubDomains; preload"
        );
    }

    #[tokio::test]
    async fn test_middleware_skips_exempt_paths() {
        let response = app(EnvironmentMode::Production)
            .oneshot(
                Request::builder()
                    .uri("/favicon.ico")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers().get("content-security-policy").is_none());

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty(), "no nonce is generated for exempt paths");
    }

    #[test]
    fn test_exempt_paths() {
        assert!(is_exempt("/favicon.ico"));
        assert!(is_exempt("/static/chunks/app.js"));
        assert!(is_exempt("/images/products/shoe.png"));
    }

    #[test]
    fn test_page_paths_are_not_exempt() {
        assert!(!is_exempt("/"));
        assert!(!is_exempt("/products/42"));
        assert!(!is_exempt("/checkout"));
        // Prefix match only, not substring.
        assert!(!is_exempt("/blog/images/"));
        assert!(!is_exempt("/staticfiles"));
    }
}
