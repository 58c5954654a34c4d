//! A single route registration and its normalization.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::routing::account::AccountType;
use crate::routing::error::{Result, RouteError};
use crate::routing::method::{HttpMethod, METHOD_PREFIX};
use crate::routing::ordered::OrderedList;

/// Capture name appended to a trailing `/*`, since the tree needs named wildcards.
pub const PREFIX_CAPTURE: &str = "path";

/// Opaque value carried through to whoever consumes a match.
pub type Handler = Arc<dyn Any + Send + Sync>;

/// Dispatch semantics of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    /// Single handler for the path.
    #[default]
    Default,
    /// Selected by the request's trading category.
    Category,
    /// Selected by the caller's resolved account type.
    AccountType,
    /// Overrides every other entry of the path.
    AllInOne,
}

impl RouteType {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteType::Default => "default",
            RouteType::Category => "category",
            RouteType::AccountType => "account_type",
            RouteType::AllInOne => "all_in_one",
        }
    }

    /// Category and account-type routes are both selected per request.
    pub fn is_selective(self) -> bool {
        matches!(self, RouteType::Category | RouteType::AccountType)
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a route path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    Static,
    /// Ends in `/*` and matches everything below it.
    Prefix,
    /// Contains `:name` segments.
    Params,
}

impl PathKind {
    /// Classify a raw path. `None` when a wildcard is anything but a single
    /// trailing `/*`.
    pub fn classify(path: &str) -> Option<PathKind> {
        if path.contains(':') {
            return Some(PathKind::Params);
        }
        match path.matches('*').count() {
            0 => Some(PathKind::Static),
            1 if path.ends_with("/*") => Some(PathKind::Prefix),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Derived {
    kind: PathKind,
    match_path: String,
    method: HttpMethod,
}

/// One route registration.
///
/// The public fields are the raw input. [`Route::build`] normalizes them
/// once and derives the matchable path; after that the route is treated as
/// immutable.
#[derive(Clone, Default)]
pub struct Route {
    pub path: String,
    pub method: String,
    /// Owning tenant/module.
    pub app_key: String,
    pub server_name: String,
    pub route_type: RouteType,
    pub values: OrderedList,
    pub account: AccountType,
    /// Seconds since the Unix epoch.
    pub update_time: u64,
    pub handler: Option<Handler>,
    derived: Option<Derived>,
}

impl Route {
    pub fn new(app_key: impl Into<String>, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, route_type: RouteType) -> Self {
        self.route_type = route_type;
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect::<Vec<String>>().into();
        self
    }

    pub fn with_account(mut self, account: AccountType) -> Self {
        self.account = account;
        self
    }

    pub fn with_server(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = server_name.into();
        self
    }

    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Normalize and validate. Idempotent: a built route is left untouched.
    pub fn build(&mut self) -> Result<()> {
        if self.derived.is_some() {
            return Ok(());
        }

        // normalized copies are committed only once every check passes
        let method_name = self
            .method
            .strip_prefix(METHOD_PREFIX)
            .unwrap_or(self.method.as_str())
            .to_ascii_uppercase();
        let mut values = self.values.clone();
        values.normalize();

        let method = method_name.parse::<HttpMethod>().map_err(|_| RouteError::InvalidMethod {
            method: method_name.clone(),
            route: self.to_string(),
        })?;

        let kind = match PathKind::classify(&self.path) {
            Some(PathKind::Params) => {
                return Err(RouteError::ParamPathUnsupported { route: self.to_string() })
            }
            None => return Err(RouteError::InvalidPrefixPath { route: self.to_string() }),
            Some(kind) => kind,
        };

        let mut match_path = self.path.clone();
        if match_path.len() > 1 && match_path.ends_with('/') {
            match_path.pop();
        }
        if match_path.is_empty() || match_path == "/" {
            return Err(RouteError::InvalidRootPath { route: self.to_string() });
        }
        if match_path.ends_with("/*") {
            match_path.push_str(PREFIX_CAPTURE);
        }

        self.method = method_name;
        self.values = values;
        self.derived = Some(Derived {
            kind,
            match_path,
            method,
        });
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.derived.is_some()
    }

    pub fn path_kind(&self) -> Option<PathKind> {
        self.derived.as_ref().map(|d| d.kind)
    }

    pub fn http_method(&self) -> Option<HttpMethod> {
        self.derived.as_ref().map(|d| d.method)
    }

    /// The path as stored in the tree; the raw path before `build`.
    pub fn match_path(&self) -> &str {
        self.derived
            .as_ref()
            .map_or(self.path.as_str(), |d| d.match_path.as_str())
    }

    /// Same registration, regardless of type and handler.
    pub fn equal(&self, other: &Route) -> bool {
        self.app_key == other.app_key
            && self.server_name == other.server_name
            && self.method == other.method
            && self.match_path() == other.match_path()
            && self.account == other.account
            && self.values == other.values
    }

    /// The catch-all entry of a category/account-type path.
    pub fn is_category_default(&self) -> bool {
        self.route_type.is_selective() && self.values.is_empty() && self.account.is_unknown()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} type={}",
            self.app_key, self.method, self.path, self.route_type
        )?;
        if !self.server_name.is_empty() {
            write!(f, " server={}", self.server_name)?;
        }
        if !self.values.is_empty() {
            write!(f, " values={}", self.values)?;
        }
        if !self.account.is_unknown() {
            write!(f, " account={}", self.account)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("app_key", &self.app_key)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("match_path", &self.match_path())
            .field("route_type", &self.route_type)
            .field("values", &self.values)
            .field("account", &self.account)
            .field("server_name", &self.server_name)
            .field("update_time", &self.update_time)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
