//! HTTP server setup and upstream forwarding.
//!
//! # Responsibilities
//! - Create the Axum router and wire up the middleware stack
//!   (tracing, request ID, security pipeline, theme negotiation,
//!   timeout, body limit)
//! - Derive the per-request policy from config once, swap it atomically
//!   on reload
//! - Forward each request to the rendering backend, single attempt
//! - Relay the response with hop-by-hop headers stripped

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, Scheme},
        Request, StatusCode, Uri,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::EdgeConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::strip_hop_by_hop;
use crate::observability::metrics;
use crate::security::csp::CspConfig;
use crate::security::headers::security_headers;
use crate::theme::hints::negotiate_theme;

/// Rendering backend used when the configured address does not parse.
const DEFAULT_RENDER_ADDRESS: &str = "127.0.0.1:3000";

/// Per-request policy derived from configuration.
///
/// Resolved once per config load so the request path only reads it; config
/// reloads swap the whole struct atomically.
#[derive(Debug, Clone)]
pub struct EdgePolicy {
    /// Static CSP inputs (API origin, environment).
    pub csp: CspConfig,
    /// Whether HSTS and the production CSP shape apply.
    pub production: bool,
    /// Authority of the rendering backend.
    pub upstream: Authority,
    /// Name of the theme preference cookie.
    pub theme_cookie: String,
}

impl EdgePolicy {
    pub fn from_config(config: &EdgeConfig) -> Self {
        let upstream = match Authority::from_str(&config.upstream.render_address) {
            Ok(authority) => authority,
            Err(e) => {
                tracing::warn!(
                    render_address = %config.upstream.render_address,
                    error = %e,
                    fallback = DEFAULT_RENDER_ADDRESS,
                    "Upstream render address did not parse, using fallback"
                );
                Authority::from_static(DEFAULT_RENDER_ADDRESS)
            }
        };

        Self {
            csp: CspConfig::from_config(config),
            production: config.environment.is_production(),
            upstream,
            theme_cookie: config.theme.cookie_name.clone(),
        }
    }
}

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<ArcSwap<EdgePolicy>>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the edge gateway.
pub struct HttpServer {
    router: Router,
    policy: Arc<ArcSwap<EdgePolicy>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &EdgeConfig) -> Self {
        let policy = Arc::new(ArcSwap::from_pointee(EdgePolicy::from_config(config)));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            policy: policy.clone(),
            client,
        };

        let router = Self::build_router(config, state);
        Self { router, policy }
    }

    /// Handle for swapping the per-request policy on config reload.
    pub fn policy(&self) -> Arc<ArcSwap<EdgePolicy>> {
        self.policy.clone()
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .with_state(state.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(middleware::from_fn_with_state(state.clone(), negotiate_theme))
            .layer(middleware::from_fn_with_state(state, security_headers))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "Edge server starting"
        );

        let app = self.router.into_make_service();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Edge server stopped");
        Ok(())
    }
}

/// Forward the request to the rendering backend, single attempt.
///
/// By the time this runs the middleware stack has already attached
/// `x-request-id`, `x-nonce`, and `x-theme` to the request headers.
async fn forward_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> impl IntoResponse {
    let start_time = Instant::now();
    let policy = state.policy.load_full();

    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method_str = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method_str,
        path = %path,
        upstream = %policy.upstream,
        "Forwarding request"
    );

    let (mut parts, body) = request.into_parts();

    // Rewrite the URI toward the rendering backend; the path and query pass
    // through untouched.
    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(policy.upstream.clone());
    let uri = Uri::from_parts(uri_parts).unwrap_or_else(|_| parts.uri.clone());

    strip_hop_by_hop(&mut parts.headers);

    let mut upstream_request = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .version(parts.version);
    if let Some(headers) = upstream_request.headers_mut() {
        for (name, value) in parts.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }
    let upstream_request = match upstream_request.body(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream request");
            metrics::record_request(&method_str, 500, start_time);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Bad upstream request").into_response();
        }
    };

    match state.client.request(upstream_request).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(&method_str, status.as_u16(), start_time);

            let (mut parts, body) = response.into_parts();
            strip_hop_by_hop(&mut parts.headers);
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                upstream = %policy.upstream,
                error = %e,
                "Upstream request failed"
            );
            metrics::record_request(&method_str, 502, start_time);
            metrics::record_upstream_error();
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
