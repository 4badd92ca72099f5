//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the site.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the site server.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Development mode. Switches the CSP header to report-only and
    /// drops Strict-Transport-Security.
    pub debug: bool,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Page template settings.
    pub templates: TemplateConfig,

    /// Static asset settings.
    pub static_files: StaticFilesConfig,

    /// Security hardening settings.
    pub security: SecurityConfig,

    /// Content-Security-Policy override. `None` uses the built-in policy.
    pub csp: Option<CspConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Page template configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding `root.html`, `no_support.html` and `no_webgl.html`.
    pub dir: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: "templates".to_string(),
        }
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Serve `/static/*` from `dir`.
    pub enabled: bool,

    /// Directory with compiled scripts, styles and images.
    pub dir: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: "static".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Add X-Frame-Options, X-Content-Type-Options and friends.
    pub enable_headers: bool,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Maximum CSP violation report size in bytes.
    pub max_report_bytes: usize,

    /// `max-age` for Strict-Transport-Security, in seconds.
    pub hsts_max_age_secs: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
            max_report_bytes: 16 * 1024,
            hsts_max_age_secs: 2_592_000, // 30 days
        }
    }
}

/// Content-Security-Policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CspConfig {
    /// Directives, rendered in the order listed.
    pub directives: Vec<CspDirectiveConfig>,

    /// Where browsers POST violation reports.
    pub report_uri: Option<String>,

    /// Token in directive values replaced by `'nonce-<value>'` per request.
    pub nonce_placeholder: String,
}

impl Default for CspConfig {
    fn default() -> Self {
        Self {
            directives: Vec::new(),
            report_uri: None,
            nonce_placeholder: DEFAULT_NONCE_PLACEHOLDER.to_string(),
        }
    }
}

/// Placeholder recognised in CSP directive values.
pub const DEFAULT_NONCE_PLACEHOLDER: &str = "{nonce}";

/// A single CSP directive as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CspDirectiveConfig {
    /// Directive name, e.g. `script-src`.
    pub name: String,

    /// Source list, e.g. `'self' https://fonts.googleapis.com`.
    pub value: String,
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
