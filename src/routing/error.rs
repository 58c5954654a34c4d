//! Routing error types.

use thiserror::Error;

/// Result type for route registration.
pub type Result<T> = std::result::Result<T, RouteError>;

/// Sentinel kind of a [`RouteError`], for matching without string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DuplicateRoute,
    InvalidMethod,
    InvalidPrefixPath,
    InvalidRootPath,
    ParamPathUnsupported,
    InvalidRouteManager,
    Conflict,
    Internal,
}

/// Errors raised while registering routes.
///
/// Every variant produced by insertion carries the offending route's
/// display form.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("duplicate route: {route}")]
    DuplicateRoute { route: String },

    #[error("invalid method '{method}': {route}")]
    InvalidMethod { method: String, route: String },

    #[error("invalid prefix path, wildcard must be a trailing '/*': {route}")]
    InvalidPrefixPath { route: String },

    #[error("invalid root path: {route}")]
    InvalidRootPath { route: String },

    #[error("path parameters are not supported: {route}")]
    ParamPathUnsupported { route: String },

    /// Reserved for registry-manager wiring failures. Nothing in this crate
    /// raises it yet.
    #[error("invalid route manager")]
    InvalidRouteManager,

    #[error("route conflict: {route}: {source}")]
    Conflict {
        route: String,
        #[source]
        source: ConflictError,
    },

    /// A trie invariant was violated while inserting; the route was not added.
    #[error("internal routing error: {route}: {source}")]
    Internal {
        route: String,
        #[source]
        source: TreeError,
    },
}

impl RouteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::DuplicateRoute { .. } => ErrorKind::DuplicateRoute,
            RouteError::InvalidMethod { .. } => ErrorKind::InvalidMethod,
            RouteError::InvalidPrefixPath { .. } => ErrorKind::InvalidPrefixPath,
            RouteError::InvalidRootPath { .. } => ErrorKind::InvalidRootPath,
            RouteError::ParamPathUnsupported { .. } => ErrorKind::ParamPathUnsupported,
            RouteError::InvalidRouteManager => ErrorKind::InvalidRouteManager,
            RouteError::Conflict { source, .. } if source.is_duplicate() => {
                ErrorKind::DuplicateRoute
            }
            RouteError::Conflict { .. } => ErrorKind::Conflict,
            RouteError::Internal { .. } => ErrorKind::Internal,
        }
    }
}

/// Reasons a route cannot join an existing [`RouteSet`](super::RouteSet).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("all-in-one route already registered by '{existing}', rejected '{incoming}' at {path}")]
    AllInOneExists {
        existing: String,
        incoming: String,
        path: String,
    },

    #[error("default route of '{existing}' cannot share {path} with '{incoming}'")]
    DefaultNotExclusive {
        existing: String,
        incoming: String,
        path: String,
    },

    #[error("type mismatch at {path}: '{existing}' registered {existing_type}, '{incoming}' registered {incoming_type}")]
    TypeMismatch {
        existing: String,
        incoming: String,
        path: String,
        existing_type: String,
        incoming_type: String,
    },

    #[error("category default already registered by '{existing}', rejected '{incoming}' at {path}")]
    CategoryDefaultExists {
        existing: String,
        incoming: String,
        path: String,
    },

    #[error("'{incoming}' overlaps '{existing}' at {path}: values {values}, account {account}")]
    Overlap {
        existing: String,
        incoming: String,
        path: String,
        values: String,
        account: String,
    },

    #[error("'{incoming}' duplicates a route of '{existing}' at {path}")]
    Duplicate {
        existing: String,
        incoming: String,
        path: String,
    },
}

impl ConflictError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ConflictError::Duplicate { .. })
    }
}

/// Faults raised by the path tree itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("path '{path}' is already registered")]
    Duplicate { path: String },

    #[error("parameter ':{incoming}' in '{path}' conflicts with existing ':{existing}'")]
    ParamConflict {
        path: String,
        existing: String,
        incoming: String,
    },

    #[error("malformed pattern '{path}': {reason}")]
    Malformed { path: String, reason: &'static str },
}

impl TreeError {
    pub(crate) fn malformed(path: &str, reason: &'static str) -> Self {
        TreeError::Malformed {
            path: path.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_duplicate_conflict() {
        let err = RouteError::Conflict {
            route: "[a] GET /x".into(),
            source: ConflictError::Duplicate {
                existing: "a".into(),
                incoming: "a".into(),
                path: "/x".into(),
            },
        };
        assert_eq!(err.kind(), ErrorKind::DuplicateRoute);
        assert!(err.to_string().contains("[a] GET /x"));
    }

    #[test]
    fn test_conflict_message_names_both_tenants() {
        let err = ConflictError::AllInOneExists {
            existing: "spot".into(),
            incoming: "futures".into(),
            path: "/v5/order/create".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("spot"));
        assert!(msg.contains("futures"));
        assert!(msg.contains("/v5/order/create"));
    }
}
