//! Applies route file events to the published registry.
//!
//! # Responsibilities
//! - Remember which tenant each route file declared
//! - Turn a file change into one atomic `replace` for that tenant
//!
//! # Design Decisions
//! - A single task owns the `Reloader`, so reloads are serialized
//! - Files are keyed by their canonical path, so a relative routes
//!   directory and the watcher's absolute event paths agree
//! - A file that switches `app_key` drops the old tenant in the same
//!   publication as it adds the new one
//! - A rejected event leaves both the registry and the file index as they
//!   were

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::loader::{canonical_route_path, ConfigError};
use crate::config::validation::ValidationError;
use crate::config::watcher::RouteFileEvent;
use crate::routing::SharedRegistry;

pub struct Reloader {
    registry: Arc<SharedRegistry>,
    tenants: HashMap<PathBuf, String>,
}

impl Reloader {
    /// `files` is the `path → app_key` map the registry was bootstrapped from.
    pub fn new<I>(registry: Arc<SharedRegistry>, files: I) -> Self
    where
        I: IntoIterator<Item = (PathBuf, String)>,
    {
        Self {
            registry,
            tenants: files
                .into_iter()
                .map(|(path, app_key)| (canonical_route_path(&path), app_key))
                .collect(),
        }
    }

    pub fn registry(&self) -> &Arc<SharedRegistry> {
        &self.registry
    }

    /// Tenant currently loaded from `path`.
    pub fn tenant_of(&self, path: &std::path::Path) -> Option<&str> {
        self.tenants
            .get(&canonical_route_path(path))
            .map(String::as_str)
    }

    pub fn apply(&mut self, event: RouteFileEvent) -> Result<(), ConfigError> {
        match event {
            RouteFileEvent::Changed { path, tenant } => {
                let path = canonical_route_path(&path);
                let (app_key, routes) = tenant.into_routes();

                if let Some((owner, _)) = self
                    .tenants
                    .iter()
                    .find(|(p, key)| **key == app_key && **p != path)
                {
                    return Err(ConfigError::Validation(vec![ValidationError::DuplicateAppKey {
                        app_key,
                        first: owner.display().to_string(),
                        second: path.display().to_string(),
                    }]));
                }

                match self.tenants.get(&path) {
                    Some(previous) if *previous != app_key => {
                        tracing::info!(
                            file = %path.display(),
                            from = %previous,
                            to = %app_key,
                            "Route file changed tenant"
                        );
                        self.registry
                            .replace_tenants(&[previous.as_str(), app_key.as_str()], routes)?;
                    }
                    _ => self.registry.replace(&app_key, routes)?,
                }
                self.tenants.insert(path, app_key);
            }
            RouteFileEvent::Removed { path } => {
                let path = canonical_route_path(&path);
                let Some(app_key) = self.tenants.get(&path) else {
                    return Ok(());
                };
                self.registry.replace(app_key, Vec::new())?;
                self.tenants.remove(&path);
            }
        }
        Ok(())
    }

    /// Apply events until the sender side closes.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<RouteFileEvent>) {
        while let Some(event) = events.recv().await {
            let path = event.path().to_path_buf();
            if let Err(e) = self.apply(event) {
                tracing::warn!(file = %path.display(), error = %e, "Route file not applied");
            }
        }
        tracing::info!("Route reload loop stopped");
    }
}
