use serde::Serialize;
use std::collections::BTreeMap;

use crate::routing::{AccountType, HttpMethod, OrderedList, PathKind, Route, RouteType, SharedRegistry};

#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub app_key: String,
    pub method: String,
    pub path: String,
    pub match_path: String,
    pub kind: Option<PathKind>,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    pub values: OrderedList,
    pub account: AccountType,
    pub server_name: String,
    pub update_time: u64,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        Self {
            app_key: route.app_key.clone(),
            method: route.method.clone(),
            path: route.path.clone(),
            match_path: route.match_path().to_string(),
            kind: route.path_kind(),
            route_type: route.route_type,
            values: route.values.clone(),
            account: route.account,
            server_name: route.server_name.clone(),
            update_time: route.update_time,
        }
    }
}

/// What a lookup would hand to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub method: HttpMethod,
    pub path: String,
    pub needs_account_lookup: bool,
    /// Candidates in selection order.
    pub candidates: Vec<RouteSummary>,
    pub params: BTreeMap<String, String>,
}

/// Every published route, optionally for one tenant only.
pub fn list_routes(registry: &SharedRegistry, tenant: Option<&str>) -> Vec<RouteSummary> {
    registry
        .load()
        .routes()
        .iter()
        .filter(|r| tenant.map_or(true, |t| r.app_key == t))
        .map(|r| RouteSummary::from(r.as_ref()))
        .collect()
}

/// `None` for an unknown method or no matching route.
pub fn resolve(registry: &SharedRegistry, method: &str, path: &str) -> Option<Resolution> {
    let method = method.parse::<HttpMethod>().ok()?;
    let snapshot = registry.load();
    let found = snapshot.lookup(method, path)?;

    Some(Resolution {
        method,
        path: path.to_string(),
        needs_account_lookup: found.routes.needs_account_lookup(),
        candidates: found
            .routes
            .items()
            .iter()
            .map(|r| RouteSummary::from(r.as_ref()))
            .collect(),
        params: found
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    })
}
