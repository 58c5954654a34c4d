//! Read-only introspection of the published routing table.
//!
//! # Data Flow
//! ```text
//! SharedRegistry snapshot
//!     → listing.rs (serializable views)
//!     → routectl (JSON on stdout) / logs
//! ```

pub mod listing;

pub use listing::{list_routes, resolve, Resolution, RouteSummary};
