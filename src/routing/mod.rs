//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (config reload):
//!     Route (raw path/method/type/values/account)
//!     → route.rs (build: normalize, classify, derive match path)
//!     → registry.rs (pick bucket by method)
//!     → bucket.rs (static → shared RouteSet, prefix → exclusive slot)
//!     → route_set.rs (ordering + conflict checks)
//!     → tree.rs (compressed prefix tree leaf)
//!
//! Lookup (request path, hot):
//!     SharedRegistry::find(method, path)
//!     → atomic snapshot load
//!     → bucket by method (array index)
//!     → tree descent (indexed child dispatch, wildcard fallback)
//!     → Return: ordered RouteSet or None
//! ```
//!
//! # Design Decisions
//! - Lookups never fail; "no route" is `None` and the caller picks the response
//! - Registration is fail-fast; one bad route aborts the whole reload
//! - Picking among the returned candidates (category, account type) is the
//!   caller's job; `RouteSet::needs_account_lookup` says whether it has to
//!   resolve the account type at all
//! - `:name` segments work in the tree but `Route::build` rejects them

pub mod account;
pub mod bucket;
pub mod error;
pub mod method;
pub mod ordered;
pub mod registry;
pub mod route;
pub mod route_set;
pub mod tree;

pub use account::AccountType;
pub use bucket::MethodBucket;
pub use error::{ConflictError, ErrorKind, Result, RouteError, TreeError};
pub use method::HttpMethod;
pub use ordered::OrderedList;
pub use registry::{Registry, RouteMatch, SharedRegistry};
pub use route::{Handler, PathKind, Route, RouteType};
pub use route_set::RouteSet;
pub use tree::{Params, PathNode};
