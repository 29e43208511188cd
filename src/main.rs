//! Storefront Edge Gateway
//!
//! Sits between the internet and the storefront's rendering backend:
//!
//! ```text
//!                    ┌────────────────────────────────────────────┐
//!                    │               EDGE GATEWAY                  │
//!                    │                                             │
//!   Client Request   │  ┌────────┐   ┌──────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│ http   │──▶│ security │──▶│  theme   │  │
//!                    │  │ server │   │ pipeline │   │negotiation│ │
//!                    │  └────────┘   └──────────┘   └────┬─────┘  │
//!                    │                                   │        │
//!                    │                                   ▼        │
//!   Client Response  │  ┌──────────┐              ┌──────────┐    │     Rendering
//!   ◀────────────────┼──│ response │◀─────────────│ upstream │◀───┼──── Backend
//!                    │  │ headers  │              │ forward  │    │
//!                    │  └──────────┘              └──────────┘    │
//!                    │                                             │
//!                    │  config · observability · lifecycle         │
//!                    └────────────────────────────────────────────┘
//! ```
//!
//! Every page request gets a fresh CSP nonce, the full security header
//! set, and a resolved theme, then passes through to the renderer
//! unmodified.

use std::env;
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use storefront_edge::config::loader::{self, build_config, CONFIG_PATH_VAR};
use storefront_edge::config::watcher::ConfigWatcher;
use storefront_edge::http::{EdgePolicy, HttpServer};
use storefront_edge::lifecycle::{signals, Shutdown};
use storefront_edge::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config()?;

    logging::init(&config);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        render_address = %config.upstream.render_address,
        api_base_url = %config.upstream.api_base_url,
        environment = ?config.environment,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config);

    // Hot reload only applies when the config came from a file.
    let mut _watcher_guard = None;
    if let Ok(path) = env::var(CONFIG_PATH_VAR) {
        let (config_watcher, mut updates) = ConfigWatcher::new(Path::new(&path));
        _watcher_guard = Some(config_watcher.run()?);

        let policy = server.policy();
        let mut shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    maybe_config = updates.recv() => match maybe_config {
                        Some(mut new_config) => {
                            loader::apply_env_overrides(&mut new_config);
                            policy.store(Arc::new(EdgePolicy::from_config(&new_config)));
                            tracing::info!("Edge policy reloaded");
                        }
                        None => break,
                    },
                    _ = shutdown_rx.recv() => break,
                }
            }
        });
    }

    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
