//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup)
//!     → matcher.rs (exact path comparison)
//!     → Return: matched Route or None
//!
//! Route Compilation (at startup):
//!     Vec<Route> from the registrar
//!     → reject empty, relative and duplicate patterns
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (listed order)

pub mod matcher;
pub mod router;

pub use matcher::{ExactPathMatcher, PathMatcher};
pub use router::{Route, RouteTable, RoutingError};
