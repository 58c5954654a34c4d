//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry reloads, config watcher, binaries produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (reload counters, route gauge)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
