//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the ordered route list
//! - Look up the route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in listed order; the table is a handful of entries
//! - First match wins
//! - Explicit `None` rather than silent default

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::handlers::RequestHandler;
use crate::routing::matcher::{ExactPathMatcher, PathMatcher};

/// Reasons a route table cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("route pattern must not be empty")]
    EmptyPattern,

    #[error("route pattern `{0}` must start with `/`")]
    MissingLeadingSlash(String),

    #[error("route pattern `{0}` is registered more than once")]
    Duplicate(String),
}

/// A path pattern bound to the handler that answers it.
#[derive(Debug, Clone)]
pub struct Route {
    matcher: ExactPathMatcher,
    handler: Arc<dyn RequestHandler>,
}

impl Route {
    pub fn new(pattern: impl Into<String>, handler: Arc<dyn RequestHandler>) -> Self {
        Self {
            matcher: ExactPathMatcher::new(pattern),
            handler,
        }
    }

    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    pub fn handler(&self) -> &dyn RequestHandler {
        self.handler.as_ref()
    }

    fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }
}

/// Immutable, ordered route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table, rejecting malformed or repeated patterns.
    pub fn new(routes: Vec<Route>) -> Result<Self, RoutingError> {
        let mut seen = HashSet::new();
        for route in &routes {
            let pattern = route.pattern();
            if pattern.is_empty() {
                return Err(RoutingError::EmptyPattern);
            }
            if !pattern.starts_with('/') {
                return Err(RoutingError::MissingLeadingSlash(pattern.to_string()));
            }
            if !seen.insert(pattern) {
                return Err(RoutingError::Duplicate(pattern.to_string()));
            }
        }

        tracing::debug!(routes = routes.len(), "Route table compiled");
        Ok(Self { routes })
    }

    /// Find the first route whose pattern matches `path`.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
