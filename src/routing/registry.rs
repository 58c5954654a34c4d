//! Route registry and its atomically published snapshot.
//!
//! # Responsibilities
//! - Dispatch lookups to the per-method bucket
//! - Keep the flat list of every registered route for listing
//! - Hot-reload one tenant's routes without readers ever seeing a partial table
//!
//! # Design Decisions
//! - A `Registry` is built completely, then published; never mutated after
//! - `SharedRegistry` readers do a single atomic load (arc-swap), no locks
//! - `replace` rebuilds from scratch off to the side and publishes only if
//!   every route was accepted; on error the published table is untouched
//! - Concurrent `replace` calls are not serialized here: the last store
//!   wins. Callers must run reloads from a single task

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Instant;

use crate::observability::metrics;
use crate::routing::bucket::MethodBucket;
use crate::routing::error::{Result, RouteError};
use crate::routing::method::HttpMethod;
use crate::routing::route::Route;
use crate::routing::route_set::RouteSet;
use crate::routing::tree::Params;

/// Result of [`Registry::lookup`].
#[derive(Debug)]
pub struct RouteMatch<'a, 'p> {
    pub routes: &'a Arc<RouteSet>,
    pub params: Params<'a, 'p>,
}

/// Routing table: one bucket per method plus every inserted route.
#[derive(Debug)]
pub struct Registry {
    buckets: [MethodBucket; HttpMethod::COUNT],
    routes: Vec<Arc<Route>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            buckets: HttpMethod::ALL.map(MethodBucket::new),
            routes: Vec::new(),
        }
    }

    /// Build and add `routes` in order, stopping at the first error.
    ///
    /// Not for use on a table readers can see: routes accepted before the
    /// failing one stay in. Use [`SharedRegistry::replace`] once traffic
    /// is flowing.
    pub fn insert<I>(&mut self, routes: I) -> Result<()>
    where
        I: IntoIterator<Item = Route>,
    {
        for route in routes {
            match self.insert_one(route) {
                Ok(route) => self.routes.push(route),
                Err(e) => {
                    tracing::debug!(error = %e, "Route rejected");
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn insert_one(&mut self, mut route: Route) -> Result<Arc<Route>> {
        route.build()?;
        let method = route.http_method().ok_or_else(|| RouteError::InvalidMethod {
            method: route.method.clone(),
            route: route.to_string(),
        })?;
        self.buckets[method.index()].insert(route)
    }

    /// Candidates for a request. `None` for no match or an unknown method.
    pub fn find(&self, method: &str, path: &str) -> Option<&Arc<RouteSet>> {
        let method = method.parse::<HttpMethod>().ok()?;
        self.lookup(method, path).map(|m| m.routes)
    }

    /// Like [`Registry::find`], also returning the wildcard capture.
    pub fn lookup<'a, 'p>(&'a self, method: HttpMethod, path: &'p str) -> Option<RouteMatch<'a, 'p>> {
        self.buckets[method.index()]
            .find(path)
            .map(|(routes, params)| RouteMatch { routes, params })
    }

    /// Every route, in insertion order.
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn bucket(&self, method: HttpMethod) -> &MethodBucket {
        &self.buckets[method.index()]
    }
}

/// A [`Registry`] behind an atomic pointer, for lock-free concurrent reads.
#[derive(Debug)]
pub struct SharedRegistry {
    current: ArcSwap<Registry>,
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(Registry::new())
    }
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
        }
    }

    /// The currently published snapshot. Hold it to make several reads
    /// against one consistent version.
    pub fn load(&self) -> Arc<Registry> {
        self.current.load_full()
    }

    pub fn find(&self, method: &str, path: &str) -> Option<Arc<RouteSet>> {
        self.current.load().find(method, path).cloned()
    }

    pub fn routes(&self) -> Vec<Arc<Route>> {
        self.current.load().routes().to_vec()
    }

    /// Swap every route of `app_key` for `routes`, all or nothing.
    pub fn replace(&self, app_key: &str, routes: Vec<Route>) -> Result<()> {
        self.replace_tenants(&[app_key], routes)
    }

    /// Drop the routes of every tenant in `app_keys` and add `routes`, as
    /// one publication.
    pub fn replace_tenants(&self, app_keys: &[&str], routes: Vec<Route>) -> Result<()> {
        let started = Instant::now();
        let tenants = app_keys.join(",");
        let current = self.current.load_full();

        let retained: Vec<Route> = current
            .routes()
            .iter()
            .filter(|r| !app_keys.contains(&r.app_key.as_str()))
            .map(|r| Route::clone(r))
            .collect();
        let retained_count = retained.len();
        let incoming = routes.len();

        let mut next = Registry::new();
        if let Err(e) = next.insert(retained).and_then(|()| next.insert(routes)) {
            tracing::warn!(tenant = %tenants, error = %e, "Route reload rejected, keeping current table");
            metrics::record_reload(&tenants, false, started.elapsed());
            return Err(e);
        }

        let total = next.len();
        self.current.store(Arc::new(next));

        tracing::info!(
            tenant = %tenants,
            retained = retained_count,
            incoming,
            total,
            "Routes reloaded"
        );
        metrics::record_reload(&tenants, true, started.elapsed());
        metrics::record_route_count(total);
        Ok(())
    }
}
