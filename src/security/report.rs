//! CSP violation report intake.
//!
//! Browsers POST a JSON document to the policy's `report-uri` whenever a
//! resource is blocked (or would be, in report-only mode). Reports are
//! logged and counted; nothing is stored.

use axum::{body::Bytes, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::observability::metrics;
use crate::security::csp::directive_label;

/// Body of a `application/csp-report` POST.
#[derive(Debug, Clone, Deserialize)]
pub struct CspReportEnvelope {
    #[serde(rename = "csp-report")]
    pub report: CspViolationReport,
}

/// A single violation, as sent by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CspViolationReport {
    pub document_uri: Option<String>,
    pub referrer: Option<String>,
    pub violated_directive: Option<String>,
    pub effective_directive: Option<String>,
    pub original_policy: Option<String>,
    pub blocked_uri: Option<String>,
    pub source_file: Option<String>,
    pub line_number: Option<u64>,
    pub column_number: Option<u64>,
    pub status_code: Option<u16>,
    pub disposition: Option<String>,
}

impl CspViolationReport {
    /// The directive to blame, preferring `effective-directive`.
    pub fn directive(&self) -> &str {
        self.effective_directive
            .as_deref()
            .or(self.violated_directive.as_deref())
            .and_then(|d| d.split_whitespace().next())
            .unwrap_or("unknown")
    }
}

/// Parse a raw report body.
pub fn parse_report(body: &[u8]) -> Result<CspViolationReport, serde_json::Error> {
    serde_json::from_slice::<CspReportEnvelope>(body).map(|envelope| envelope.report)
}

/// Handler for `POST {report-uri}`.
pub async fn receive_report(body: Bytes) -> StatusCode {
    match parse_report(&body) {
        Ok(report) => {
            let directive = report.directive();
            tracing::warn!(
                directive = %directive,
                blocked_uri = report.blocked_uri.as_deref().unwrap_or(""),
                document_uri = report.document_uri.as_deref().unwrap_or(""),
                disposition = report.disposition.as_deref().unwrap_or(""),
                "CSP violation reported"
            );
            metrics::record_csp_report(directive_label(directive));
            StatusCode::NO_CONTENT
        }
        Err(e) => {
            tracing::debug!(error = %e, "Discarding malformed CSP report");
            StatusCode::BAD_REQUEST
        }
    }
}
