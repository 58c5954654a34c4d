//! Configuration schema definitions.
//!
//! Two kinds of file: the daemon config (`RouterConfig`) and one route file
//! per tenant (`TenantRoutes`). All types derive Serde traits for
//! deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::routing::{AccountType, Route, RouteType};

/// Root configuration for the router daemon.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Directory holding one `*.toml` route file per tenant.
    pub routes_dir: PathBuf,

    /// Hot reload of the routes directory.
    pub watch: WatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            routes_dir: PathBuf::from("routes"),
            watch: WatchConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Route directory watch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    pub enabled: bool,

    /// Poll interval for backends without native events.
    pub poll_interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: 2,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Contents of one tenant route file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TenantRoutes {
    /// Tenant owning every route in the file.
    pub app_key: String,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl TenantRoutes {
    /// Split into the tenant key and its core routes.
    pub fn into_routes(self) -> (String, Vec<Route>) {
        let routes = self
            .routes
            .into_iter()
            .map(|r| r.into_route(&self.app_key))
            .collect();
        (self.app_key, routes)
    }
}

/// A single route entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Request path: exact, or a prefix ending in `/*`.
    pub path: String,

    /// HTTP method; the `HTTP_METHOD_` prefix is accepted.
    pub method: String,

    /// Upstream service name.
    #[serde(default)]
    pub server_name: String,

    #[serde(default, rename = "type")]
    pub route_type: RouteType,

    /// Selector values (categories) for `category` routes.
    #[serde(default)]
    pub values: Vec<String>,

    #[serde(default)]
    pub account: AccountType,

    /// Last modification, seconds since the epoch.
    #[serde(default)]
    pub update_time: u64,
}

impl RouteConfig {
    pub fn into_route(self, app_key: &str) -> Route {
        let mut route = Route::new(app_key, self.method, self.path)
            .with_type(self.route_type)
            .with_values(self.values)
            .with_account(self.account)
            .with_server(self.server_name);
        route.update_time = self.update_time;
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_config_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.routes_dir, PathBuf::from("routes"));
        assert!(config.watch.enabled);
        assert_eq!(config.watch.poll_interval_secs, 2);
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_tenant_file_parses() {
        let tenant: TenantRoutes = toml::from_str(
            r#"
            app_key = "trade"

            [[routes]]
            path = "/v5/order/create"
            method = "HTTP_METHOD_POST"
            server_name = "order-svc"
            type = "category"
            values = ["spot", "Linear"]
            account = "uta"
            update_time = 1700000000

            [[routes]]
            path = "/static/*"
            method = "get"
            "#,
        )
        .unwrap();

        assert_eq!(tenant.app_key, "trade");
        assert_eq!(tenant.routes.len(), 2);
        assert_eq!(tenant.routes[0].route_type, RouteType::Category);
        assert_eq!(tenant.routes[0].account, AccountType::UNIFIED_TRADING);
        assert_eq!(tenant.routes[1].route_type, RouteType::Default);
        assert!(tenant.routes[1].account.is_unknown());
    }

    #[test]
    fn test_into_routes_carries_fields() {
        let tenant = TenantRoutes {
            app_key: "trade".into(),
            routes: vec![RouteConfig {
                path: "/v5/order/create".into(),
                method: "POST".into(),
                server_name: "order-svc".into(),
                route_type: RouteType::Category,
                values: vec!["spot".into()],
                account: AccountType::NORMAL,
                update_time: 42,
            }],
        };

        let (app_key, mut routes) = tenant.into_routes();
        assert_eq!(app_key, "trade");
        let route = &mut routes[0];
        assert_eq!(route.app_key, "trade");
        assert_eq!(route.server_name, "order-svc");
        assert_eq!(route.update_time, 42);
        assert!(route.handler.is_none());
        route.build().unwrap();
        assert!(route.values.contains("spot"));
    }

    #[test]
    fn test_unknown_route_type_is_rejected() {
        let result: Result<TenantRoutes, _> = toml::from_str(
            r#"
            app_key = "a"
            [[routes]]
            path = "/x"
            method = "GET"
            type = "weighted"
            "#,
        );
        assert!(result.is_err());
    }
}
