//! Ordered candidates registered for one (method, path).
//!
//! # Invariants
//! - At most one all-in-one entry, always first
//! - A default entry is the only entry besides an all-in-one
//! - Every entry after a leading all-in-one has the same type
//! - At most one category default, always last
//! - No two category/account-type entries overlap in both values and
//!   account, since the request-time selector could not tell them apart

use std::sync::Arc;

use crate::routing::error::ConflictError;
use crate::routing::route::{Route, RouteType};

/// Candidate list for one exact (method, path).
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    items: Vec<Arc<Route>>,
    needs_account_lookup: bool,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Arc<Route>] {
        &self.items
    }

    /// The all-in-one entry if present, otherwise the first inserted.
    pub fn first(&self) -> Option<&Arc<Route>> {
        self.items.first()
    }

    /// The category default if present.
    pub fn last(&self) -> Option<&Arc<Route>> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any entry depends on the caller's account type. When false
    /// the caller can skip resolving it.
    pub fn needs_account_lookup(&self) -> bool {
        self.needs_account_lookup
    }

    /// Entries after a leading all-in-one.
    fn selectable(&self) -> &[Arc<Route>] {
        match self.items.first() {
            Some(first) if first.route_type == RouteType::AllInOne => &self.items[1..],
            _ => &self.items,
        }
    }

    /// Check `candidate` against every invariant without inserting it.
    pub fn can_insert(&self, candidate: &Route) -> Result<(), ConflictError> {
        let path = || candidate.match_path().to_string();
        let incoming = || candidate.app_key.clone();

        if candidate.route_type == RouteType::AllInOne {
            if let Some(existing) = self.items.iter().find(|r| r.route_type == RouteType::AllInOne) {
                return Err(ConflictError::AllInOneExists {
                    existing: existing.app_key.clone(),
                    incoming: incoming(),
                    path: path(),
                });
            }
        } else {
            let rest = self.selectable();

            if let Some(first) = rest.first() {
                let default = rest.iter().find(|r| r.route_type == RouteType::Default);
                if default.is_some() || candidate.route_type == RouteType::Default {
                    return Err(ConflictError::DefaultNotExclusive {
                        existing: default.unwrap_or(first).app_key.clone(),
                        incoming: incoming(),
                        path: path(),
                    });
                }
            }

            if let Some(other) = rest.iter().find(|r| r.route_type != candidate.route_type) {
                return Err(ConflictError::TypeMismatch {
                    existing: other.app_key.clone(),
                    incoming: incoming(),
                    path: path(),
                    existing_type: other.route_type.to_string(),
                    incoming_type: candidate.route_type.to_string(),
                });
            }

            if candidate.is_category_default() {
                if let Some(existing) = rest.iter().find(|r| r.is_category_default()) {
                    return Err(ConflictError::CategoryDefaultExists {
                        existing: existing.app_key.clone(),
                        incoming: incoming(),
                        path: path(),
                    });
                }
            } else if candidate.route_type.is_selective() {
                let overlapping = rest.iter().find(|r| {
                    !r.is_category_default()
                        && r.values.contains_any(&candidate.values)
                        && r.account.is(candidate.account)
                });
                if let Some(existing) = overlapping {
                    return Err(ConflictError::Overlap {
                        existing: existing.app_key.clone(),
                        incoming: incoming(),
                        path: path(),
                        values: format!("{} vs {}", existing.values, candidate.values),
                        account: format!("{} vs {}", existing.account, candidate.account),
                    });
                }
            }
        }

        if let Some(existing) = self.items.iter().find(|r| r.equal(candidate)) {
            return Err(ConflictError::Duplicate {
                existing: existing.app_key.clone(),
                incoming: incoming(),
                path: path(),
            });
        }

        Ok(())
    }

    /// Insert `candidate` in its ordered position.
    pub fn insert(&mut self, candidate: Arc<Route>) -> Result<(), ConflictError> {
        self.can_insert(&candidate)?;

        let trailing_default = self.items.last().is_some_and(|r| r.is_category_default());
        match candidate.route_type {
            RouteType::AllInOne => self.items.insert(0, candidate),
            RouteType::Default => self.items.push(candidate),
            _ if trailing_default => {
                let at = self.items.len() - 1;
                self.items.insert(at, candidate);
            }
            _ => self.items.push(candidate),
        }

        self.needs_account_lookup = self
            .items
            .iter()
            .any(|r| r.route_type.is_selective() && !r.account.is_unknown());
        Ok(())
    }
}
