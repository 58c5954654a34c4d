//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route entries carry the fields the registry needs
//! - Detect two route files claiming the same tenant
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure functions over parsed config; nothing touches the registry
//! - Route shape and conflicts are checked when the registry is built,
//!   not here

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::schema::{RouterConfig, TenantRoutes};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("app_key is empty")]
    EmptyAppKey,

    #[error("route #{index}: path is empty")]
    EmptyPath { index: usize },

    #[error("route #{index} ({path}): method is empty")]
    EmptyMethod { index: usize, path: String },

    #[error("app_key '{app_key}' declared by both {first} and {second}")]
    DuplicateAppKey {
        app_key: String,
        first: String,
        second: String,
    },

    #[error("watch.poll_interval_secs must be greater than zero")]
    ZeroPollInterval,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.watch.enabled && config.watch.poll_interval_secs == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(obs.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_tenant(tenant: &TenantRoutes) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if tenant.app_key.trim().is_empty() {
        errors.push(ValidationError::EmptyAppKey);
    }

    for (index, route) in tenant.routes.iter().enumerate() {
        if route.path.is_empty() {
            errors.push(ValidationError::EmptyPath { index });
        }
        if route.method.trim().is_empty() {
            errors.push(ValidationError::EmptyMethod {
                index,
                path: route.path.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every tenant may own exactly one route file.
pub fn validate_tenants(files: &[(PathBuf, TenantRoutes)]) -> Result<(), Vec<ValidationError>> {
    let mut seen: HashMap<&str, &PathBuf> = HashMap::new();
    let mut errors = Vec::new();

    for (path, tenant) in files {
        if let Some(first) = seen.insert(&tenant.app_key, path) {
            errors.push(ValidationError::DuplicateAppKey {
                app_key: tenant.app_key.clone(),
                first: first.display().to_string(),
                second: path.display().to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
