//! Gateway router daemon.
//!
//! Loads every tenant route file, publishes the routing table and keeps it
//! in sync with the routes directory until interrupted.
//!
//! # Architecture Overview
//!
//! ```text
//!   routes/*.toml ──▶ loader ──▶ Registry ──▶ SharedRegistry ◀── find() (readers)
//!        │                                        ▲
//!        ▼                                        │
//!     watcher ──▶ RouteFileEvent ──▶ Reloader ────┘ replace(tenant, routes)
//! ```
//!
//! Usage: `gateway-router [router.toml]`. Without a config file the
//! defaults apply (`routes/`, watch on, metrics off).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gateway_router::config::loader::{build_registry, load_config, load_routes_dir};
use gateway_router::config::{Reloader, RouteWatcher, RouterConfig};
use gateway_router::observability::{logging, metrics};
use gateway_router::SharedRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("gateway-router v{} starting", env!("CARGO_PKG_VERSION"));

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

    let files = load_routes_dir(&config.routes_dir)?;
    let registry = build_registry(&files)?;
    tracing::info!(
        dir = %config.routes_dir.display(),
        tenants = files.len(),
        routes = registry.len(),
        "Routing table built"
    );
    metrics::record_route_count(registry.len());

    let shared = Arc::new(SharedRegistry::new(registry));
    let index = files.into_iter().map(|(path, tenant)| (path, tenant.app_key));
    let reloader = Reloader::new(Arc::clone(&shared), index);

    // Keep the watcher alive for the lifetime of the process.
    let _watcher = if config.watch.enabled {
        let poll = Duration::from_secs(config.watch.poll_interval_secs);
        let (watcher, events) = RouteWatcher::new(&config.routes_dir, poll);
        let handle = watcher.run()?;
        tokio::spawn(reloader.run(events));
        Some(handle)
    } else {
        tracing::info!("Route watching disabled");
        None
    };

    tokio::signal::ctrl_c().await?;

    tracing::info!(routes = shared.load().len(), "Shutdown complete");
    Ok(())
}
