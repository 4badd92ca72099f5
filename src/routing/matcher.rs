//! Route matching logic.
//!
//! # Responsibilities
//! - Match a request path against a route pattern
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Patterns are literal paths, no wildcards or regex
//! - Query strings never reach the matcher (axum strips them from `path()`)

/// Trait for matching request paths against a route pattern.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this pattern.
    fn matches(&self, path: &str) -> bool;

    /// The pattern as written in the route table.
    fn pattern(&self) -> &str;
}

/// Matches one literal path exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    /// Create a new exact path matcher.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl PathMatcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> bool {
        path == self.path
    }

    fn pattern(&self) -> &str {
        &self.path
    }
}
