//! Hardening response headers.
//!
//! # Responsibilities
//! - Decide which security headers every page carries
//! - Drop Strict-Transport-Security in debug (local dev runs over plain HTTP)
//!
//! # Design Decisions
//! - Headers are only set when absent, so a handler can override one

use axum::http::{header, HeaderName, HeaderValue};

/// Headers added to every response when `security.enable_headers` is on.
pub fn hardening_headers(debug: bool, hsts_max_age_secs: u64) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = vec![
        (
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ),
        (
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
        (
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ),
    ];

    if !debug {
        let hsts = format!("max-age={hsts_max_age_secs}; includeSubdomains");
        if let Ok(value) = HeaderValue::try_from(hsts) {
            headers.push((header::STRICT_TRANSPORT_SECURITY, value));
        }
    }

    headers
}
