//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check CSP directive names and report URI shape
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::SiteConfig;
use crate::http::server::is_under_static_prefix;
use crate::security::csp::{is_valid_directive_name, is_valid_report_uri};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("security.{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("csp directive name `{0}` is invalid")]
    DirectiveName(String),

    #[error("csp directive `{0}` is declared more than once")]
    DuplicateDirective(String),

    #[error("csp report_uri `{0}` must be a literal path starting with `/`")]
    ReportUri(String),

    #[error("csp report_uri `{0}` overlaps the static asset mount")]
    ReportUriStatic(String),

    #[error("csp nonce_placeholder must not be empty")]
    EmptyNoncePlaceholder,
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroLimit("max_body_size"));
    }
    if config.security.max_report_bytes == 0 {
        errors.push(ValidationError::ZeroLimit("max_report_bytes"));
    }

    if let Some(csp) = &config.csp {
        let mut seen = HashSet::new();
        for directive in &csp.directives {
            if !is_valid_directive_name(&directive.name) {
                errors.push(ValidationError::DirectiveName(directive.name.clone()));
            } else if !seen.insert(directive.name.as_str()) {
                errors.push(ValidationError::DuplicateDirective(directive.name.clone()));
            }
        }

        if let Some(uri) = &csp.report_uri {
            if !is_valid_report_uri(uri) {
                errors.push(ValidationError::ReportUri(uri.clone()));
            } else if is_under_static_prefix(uri) {
                errors.push(ValidationError::ReportUriStatic(uri.clone()));
            }
        }

        if csp.nonce_placeholder.is_empty() {
            errors.push(ValidationError::EmptyNoncePlaceholder);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CspConfig, CspDirectiveConfig};

    fn directive(name: &str, value: &str) -> CspDirectiveConfig {
        CspDirectiveConfig {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&SiteConfig::default()), Ok(()));
    }

    #[test]
    fn metrics_address_only_checked_when_enabled() {
        let mut config = SiteConfig::default();
        config.observability.metrics_address = "garbage".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MetricsAddress("garbage".into())])
        );
    }

    #[test]
    fn csp_problems_are_collected() {
        let mut config = SiteConfig::default();
        config.csp = Some(CspConfig {
            directives: vec![
                directive("object-src", "'none'"),
                directive("Object Src", "'none'"),
                directive("object-src", "'self'"),
            ],
            report_uri: Some("csp".into()),
            nonce_placeholder: String::new(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DirectiveName("Object Src".into()),
                ValidationError::DuplicateDirective("object-src".into()),
                ValidationError::ReportUri("csp".into()),
                ValidationError::EmptyNoncePlaceholder,
            ]
        );
    }

    #[test]
    fn report_uri_must_be_mountable() {
        let cases = [
            ("/:csp", ValidationError::ReportUri("/:csp".into())),
            ("/{x}", ValidationError::ReportUri("/{x}".into())),
            ("/static", ValidationError::ReportUriStatic("/static".into())),
            ("/static/csp", ValidationError::ReportUriStatic("/static/csp".into())),
        ];

        for (uri, expected) in cases {
            let mut config = SiteConfig::default();
            config.csp = Some(CspConfig {
                report_uri: Some(uri.into()),
                ..CspConfig::default()
            });
            assert_eq!(validate_config(&config), Err(vec![expected]), "{uri}");
        }

        let mut config = SiteConfig::default();
        config.csp = Some(CspConfig {
            report_uri: Some("/static-csp".into()),
            ..CspConfig::default()
        });
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn zero_limits_rejected() {
        let mut config = SiteConfig::default();
        config.security.max_body_size = 0;
        config.security.max_report_bytes = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroLimit("max_body_size"),
                ValidationError::ZeroLimit("max_report_bytes"),
            ]
        );
    }
}
