//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{RouterConfig, TenantRoutes};
use crate::config::validation::{validate_config, validate_tenant, validate_tenants, ValidationError};
use crate::routing::{Registry, RouteError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Routing(#[from] RouteError),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate the daemon configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = read(path)?;
    let config: RouterConfig = parse(path, &content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate one tenant route file.
pub fn load_tenant_file(path: &Path) -> Result<TenantRoutes, ConfigError> {
    let content = read(path)?;
    let tenant: TenantRoutes = parse(path, &content)?;

    validate_tenant(&tenant).map_err(ConfigError::Validation)?;

    Ok(tenant)
}

/// Whether `path` looks like a route file.
pub fn is_route_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Absolute, symlink-free form of a route file path, used as the key for
/// every file the router tracks. The file may already be gone, so only its
/// directory is resolved.
pub fn canonical_route_path(path: &Path) -> PathBuf {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return path.to_path_buf();
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    match fs::canonicalize(parent) {
        Ok(dir) => dir.join(name),
        Err(_) => path.to_path_buf(),
    }
}

/// Load every route file in `dir`, sorted by file name. Returned paths are
/// canonical (see [`canonical_route_path`]).
pub fn load_routes_dir(dir: &Path) -> Result<Vec<(PathBuf, TenantRoutes)>, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let resolved = fs::canonicalize(dir).map_err(io_err)?;
    let mut paths = Vec::new();
    for entry in fs::read_dir(&resolved).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_route_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let tenant = load_tenant_file(&path)?;
        files.push((path, tenant));
    }

    validate_tenants(&files).map_err(ConfigError::Validation)?;

    tracing::debug!(dir = %dir.display(), files = files.len(), "Route files loaded");
    Ok(files)
}

/// Build a fresh registry from loaded route files.
pub fn build_registry(files: &[(PathBuf, TenantRoutes)]) -> Result<Registry, ConfigError> {
    let mut registry = Registry::new();
    for (path, tenant) in files {
        let (app_key, routes) = tenant.clone().into_routes();
        if let Err(e) = registry.insert(routes) {
            tracing::error!(file = %path.display(), tenant = %app_key, error = %e, "Route file rejected");
            return Err(e.into());
        }
    }
    Ok(registry)
}
