//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → csp.rs (generate nonce, expose it to handlers)
//!     → handler renders the page
//!     → csp.rs (stamp Content-Security-Policy header)
//!     → headers.rs (frame, sniffing, HSTS headers)
//!
//! Browser violation reports:
//!     POST report-uri → report.rs (parse, log, count)
//! ```
//!
//! # Design Decisions
//! - Every response carries the policy, including errors and static assets
//! - Debug builds report instead of enforcing

pub mod csp;
pub mod headers;
pub mod nonce;
pub mod report;

pub use csp::{CspPolicy, CspPolicyBuilder, PolicyError};
pub use nonce::{NonceGenerator, RequestNonce};
pub use report::CspViolationReport;
