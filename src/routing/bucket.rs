//! Path tree for a single HTTP method.

use std::sync::Arc;

use crate::routing::error::{Result, RouteError, TreeError};
use crate::routing::method::HttpMethod;
use crate::routing::route::{PathKind, Route};
use crate::routing::route_set::RouteSet;
use crate::routing::tree::{PathNode, Params};

/// All routes of one method. Leaves are [`RouteSet`]s; a prefix route
/// always sits alone in its set.
#[derive(Debug)]
pub struct MethodBucket {
    method: HttpMethod,
    tree: PathNode<Arc<RouteSet>>,
    len: usize,
}

impl MethodBucket {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            tree: PathNode::new(),
            len: 0,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Number of routes held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Build `route` and add it. Nothing is modified on error.
    pub fn insert(&mut self, mut route: Route) -> Result<Arc<Route>> {
        route.build()?;
        if route.http_method() != Some(self.method) {
            return Err(RouteError::InvalidMethod {
                method: route.method.clone(),
                route: route.to_string(),
            });
        }

        let route = Arc::new(route);
        let conflict = |source| RouteError::Conflict {
            route: route.to_string(),
            source,
        };
        let tree_fault = |source: TreeError| match source {
            TreeError::Duplicate { .. } => RouteError::DuplicateRoute {
                route: route.to_string(),
            },
            source => RouteError::Internal {
                route: route.to_string(),
                source,
            },
        };

        match route.path_kind() {
            Some(PathKind::Static) => {
                if let Some(set) = self.tree.get_mut(route.match_path()) {
                    Arc::make_mut(set).insert(route.clone()).map_err(conflict)?;
                } else {
                    let mut set = RouteSet::new();
                    set.insert(route.clone()).map_err(conflict)?;
                    self.tree
                        .insert(route.match_path(), Arc::new(set))
                        .map_err(tree_fault)?;
                }
            }
            // a prefix slot holds exactly one route
            Some(PathKind::Prefix) => {
                let mut set = RouteSet::new();
                set.insert(route.clone()).map_err(conflict)?;
                self.tree
                    .insert(route.match_path(), Arc::new(set))
                    .map_err(tree_fault)?;
            }
            Some(PathKind::Params) | None => {
                return Err(RouteError::ParamPathUnsupported {
                    route: route.to_string(),
                })
            }
        }

        self.len += 1;
        Ok(route)
    }

    pub fn find<'a, 'p>(&'a self, path: &'p str) -> Option<(&'a Arc<RouteSet>, Params<'a, 'p>)> {
        self.tree.find(path)
    }
}
