//! Multi-tenant API gateway routing table.

pub mod admin;
pub mod config;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use routing::{ErrorKind, Registry, Route, RouteError, RouteSet, RouteType, SharedRegistry};
