//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! router.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!
//! routes/*.toml (one tenant per file):
//!     startup: loader.rs load_routes_dir → build_registry → SharedRegistry
//!     on change: watcher.rs detects change
//!         → loader.rs loads + validates the file
//!         → reload.rs replaces that tenant atomically
//!         → readers observe the new table on their next lookup
//! ```
//!
//! # Design Decisions
//! - Daemon config is read once; only route files hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A bad route file is logged and skipped; the live table never changes
//!   on error

pub mod loader;
pub mod reload;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::ConfigError;
pub use reload::Reloader;
pub use schema::{ObservabilityConfig, RouteConfig, RouterConfig, TenantRoutes, WatchConfig};
pub use watcher::{RouteFileEvent, RouteWatcher};
