//! Route directory watcher for hot reload.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::{canonical_route_path, is_route_file, load_tenant_file};
use crate::config::schema::TenantRoutes;

/// A route file that changed on disk.
#[derive(Debug)]
pub enum RouteFileEvent {
    /// Created or modified, already parsed and validated.
    Changed { path: PathBuf, tenant: TenantRoutes },
    Removed { path: PathBuf },
}

impl RouteFileEvent {
    pub fn path(&self) -> &Path {
        match self {
            RouteFileEvent::Changed { path, .. } | RouteFileEvent::Removed { path } => path,
        }
    }
}

/// A watcher that monitors the routes directory for changes.
pub struct RouteWatcher {
    dir: PathBuf,
    poll_interval: Duration,
    event_tx: mpsc::UnboundedSender<RouteFileEvent>,
}

impl RouteWatcher {
    /// Create a new RouteWatcher.
    ///
    /// Returns the watcher and a receiver for route file events.
    pub fn new(dir: &Path, poll_interval: Duration) -> (Self, mpsc::UnboundedReceiver<RouteFileEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        (
            Self {
                dir: dir.to_path_buf(),
                poll_interval,
                event_tx,
            },
            event_rx,
        )
    }

    /// Start watching in a background thread. Dropping the returned
    /// watcher stops it. Event paths are canonical, matching the keys
    /// returned by `load_routes_dir`.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.event_tx.clone();
        let dir = std::fs::canonicalize(&self.dir)?;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for path in event.paths.iter().filter(|p| is_route_file(p)) {
                        if let Some(ev) = classify(&event, path) {
                            let _ = tx.send(ev);
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(dir = ?dir, "Route watcher started");
        Ok(watcher)
    }
}

fn classify(event: &Event, path: &Path) -> Option<RouteFileEvent> {
    let path = canonical_route_path(path);
    let path = path.as_path();

    // renames report the old name as a modify; existence is the arbiter
    if event.kind.is_remove() || !path.exists() {
        tracing::info!(file = %path.display(), "Route file removed");
        return Some(RouteFileEvent::Removed {
            path: path.to_path_buf(),
        });
    }

    if !(event.kind.is_modify() || event.kind.is_create()) {
        return None;
    }

    tracing::info!(file = %path.display(), "Route file change detected, reloading...");
    match load_tenant_file(path) {
        Ok(tenant) => Some(RouteFileEvent::Changed {
            path: path.to_path_buf(),
            tenant,
        }),
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload route file. Keeping current routes.");
            None
        }
    }
}
