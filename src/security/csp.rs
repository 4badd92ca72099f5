//! Content-Security-Policy model and header rendering.
//!
//! # Responsibilities
//! - Hold the ordered directive list, report URI and report-only flag
//! - Render the header name and value for a response
//! - Substitute the per-request nonce into directives that ask for it
//! - Attach the header to every outgoing response (middleware)
//!
//! # Design Decisions
//! - Directives render in declaration order so output is deterministic
//! - Values are checked once at build time; rendering cannot fail later
//!   because nonces are plain hex

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::config::schema::DEFAULT_NONCE_PLACEHOLDER;
use crate::security::nonce::{NonceGenerator, RequestNonce};

/// Key used for the report URI in the policy mapping.
pub const REPORT_URI_KEY: &str = "report-uri";

/// Key used for the report-only flag in the policy mapping.
pub const REPORT_ONLY_KEY: &str = "reportOnly";

/// Reasons a policy cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("directive name `{0}` is invalid")]
    InvalidDirectiveName(String),

    #[error("directive `{0}` is declared more than once")]
    DuplicateDirective(String),

    #[error("value of directive `{0}` is not valid header text")]
    InvalidValue(String),

    #[error("report uri `{0}` must be a literal path starting with `/`")]
    InvalidReportUri(String),
}

/// Directives browsers name in violation reports. Anything else is
/// counted as `other`.
pub const KNOWN_DIRECTIVES: [&str; 27] = [
    "base-uri",
    "child-src",
    "connect-src",
    "default-src",
    "font-src",
    "form-action",
    "frame-ancestors",
    "frame-src",
    "img-src",
    "manifest-src",
    "media-src",
    "navigate-to",
    "object-src",
    "plugin-types",
    "prefetch-src",
    "require-trusted-types-for",
    "sandbox",
    "script-src",
    "script-src-attr",
    "script-src-elem",
    "style-src",
    "style-src-attr",
    "style-src-elem",
    "trusted-types",
    "upgrade-insecure-requests",
    "webrtc-src",
    "worker-src",
];

/// Metrics label for a client-supplied directive name.
pub fn directive_label(name: &str) -> &'static str {
    if !is_valid_directive_name(name) {
        return "other";
    }
    KNOWN_DIRECTIVES
        .iter()
        .find(|known| **known == name)
        .copied()
        .unwrap_or("other")
}

/// Report URIs are mounted as axum routes: only literal absolute paths,
/// no `:`, `*`, `{` or `}` route syntax.
pub fn is_valid_report_uri(uri: &str) -> bool {
    uri.starts_with('/')
        && !uri.contains(|c: char| matches!(c, ':' | '*' | '{' | '}'))
        && HeaderValue::from_str(uri).is_ok()
}

/// Directive names are lowercase ASCII words joined by `-`.
pub fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// A single `name value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspDirective {
    name: String,
    value: String,
}

impl CspDirective {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An immutable Content-Security-Policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspPolicy {
    directives: Vec<CspDirective>,
    report_uri: Option<String>,
    report_only: bool,
    nonce_placeholder: String,
}

impl CspPolicy {
    pub fn builder() -> CspPolicyBuilder {
        CspPolicyBuilder::default()
    }

    pub fn directives(&self) -> &[CspDirective] {
        &self.directives
    }

    pub fn directive(&self, name: &str) -> Option<&str> {
        self.directives
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    pub fn report_uri(&self) -> Option<&str> {
        self.report_uri.as_deref()
    }

    pub fn report_only(&self) -> bool {
        self.report_only
    }

    /// True when some directive carries the nonce placeholder.
    pub fn uses_nonce(&self) -> bool {
        self.directives
            .iter()
            .any(|d| d.value.contains(&self.nonce_placeholder))
    }

    /// `Content-Security-Policy`, or its report-only sibling.
    pub fn header_name(&self) -> HeaderName {
        if self.report_only {
            header::CONTENT_SECURITY_POLICY_REPORT_ONLY
        } else {
            header::CONTENT_SECURITY_POLICY
        }
    }

    /// Render the header value, stamping `nonce` where the placeholder sits.
    pub fn header_value(&self, nonce: Option<&str>) -> String {
        let nonce_source = nonce.map(|n| format!("'nonce-{n}'"));
        let mut parts: Vec<String> = self
            .directives
            .iter()
            .map(|d| match &nonce_source {
                Some(source) => format!(
                    "{} {}",
                    d.name,
                    d.value.replace(&self.nonce_placeholder, source)
                ),
                None => format!("{} {}", d.name, d.value),
            })
            .collect();

        if let Some(uri) = &self.report_uri {
            parts.push(format!("{REPORT_URI_KEY} {uri}"));
        }

        parts.join("; ")
    }
}

/// The mapping form: directives, then `report-uri`, then `reportOnly`.
impl Serialize for CspPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.directives.len() + usize::from(self.report_uri.is_some()) + 1;
        let mut map = serializer.serialize_map(Some(len))?;
        for d in &self.directives {
            map.serialize_entry(&d.name, &d.value)?;
        }
        if let Some(uri) = &self.report_uri {
            map.serialize_entry(REPORT_URI_KEY, uri)?;
        }
        map.serialize_entry(REPORT_ONLY_KEY, &self.report_only)?;
        map.end()
    }
}

/// Builder for [`CspPolicy`].
#[derive(Debug, Clone)]
pub struct CspPolicyBuilder {
    directives: Vec<CspDirective>,
    report_uri: Option<String>,
    report_only: bool,
    nonce_placeholder: String,
}

impl Default for CspPolicyBuilder {
    fn default() -> Self {
        Self {
            directives: Vec::new(),
            report_uri: None,
            report_only: false,
            nonce_placeholder: DEFAULT_NONCE_PLACEHOLDER.to_string(),
        }
    }
}

impl CspPolicyBuilder {
    pub fn directive(mut self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.directives.push(CspDirective {
            name: name.into(),
            value: value.as_ref().trim().to_string(),
        });
        self
    }

    pub fn report_uri(mut self, uri: impl Into<String>) -> Self {
        self.report_uri = Some(uri.into());
        self
    }

    pub fn report_only(mut self, report_only: bool) -> Self {
        self.report_only = report_only;
        self
    }

    pub fn nonce_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.nonce_placeholder = placeholder.into();
        self
    }

    pub fn build(self) -> Result<CspPolicy, PolicyError> {
        let mut seen = std::collections::HashSet::new();
        for d in &self.directives {
            if !is_valid_directive_name(&d.name) {
                return Err(PolicyError::InvalidDirectiveName(d.name.clone()));
            }
            if !seen.insert(d.name.as_str()) {
                return Err(PolicyError::DuplicateDirective(d.name.clone()));
            }
            if HeaderValue::from_str(&d.value).is_err() {
                return Err(PolicyError::InvalidValue(d.name.clone()));
            }
        }

        if let Some(uri) = &self.report_uri {
            if !is_valid_report_uri(uri) {
                return Err(PolicyError::InvalidReportUri(uri.clone()));
            }
        }

        Ok(CspPolicy {
            directives: self.directives,
            report_uri: self.report_uri,
            report_only: self.report_only,
            nonce_placeholder: self.nonce_placeholder,
        })
    }
}

/// Generate a nonce for the request, expose it to handlers, and stamp the
/// policy header on the response.
pub async fn csp_middleware(
    State(policy): State<Arc<CspPolicy>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let nonce = NonceGenerator::generate();
    req.extensions_mut().insert(nonce.clone());

    let mut response = next.run(req).await;

    let value = policy.header_value(Some(nonce.as_str()));
    match HeaderValue::from_str(&value) {
        Ok(value) => {
            response.headers_mut().insert(policy.header_name(), value);
        }
        Err(e) => {
            tracing::error!(error = %e, "Rendered CSP header is not a valid header value");
        }
    }

    response
}

/// Nonce attached by [`csp_middleware`], if any.
pub fn request_nonce<B>(req: &Request<B>) -> Option<&RequestNonce> {
    req.extensions().get::<RequestNonce>()
}
