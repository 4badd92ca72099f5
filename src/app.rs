//! The application object: a route table plus the configuration mapping
//! the runtime reads on every response.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::handlers::TemplateError;
use crate::http::server::is_under_static_prefix;
use crate::routing::{Route, RouteTable, RoutingError};
use crate::security::PolicyError;

/// Startup failures. All of them are fatal.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid route table: {0}")]
    Routing(#[from] RoutingError),

    #[error("invalid CSP policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("report uri `{0}` collides with a page route or the static mount")]
    ReportUriCollision(String),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Configuration mapping handed to the application at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub csp_policy: crate::security::CspPolicy,
    pub debug: bool,

    /// Runtime settings (listener, limits, directories).
    #[serde(skip)]
    pub settings: SiteConfig,
}

/// A constructed application, ready to be served.
#[derive(Debug, Clone)]
pub struct Application {
    routes: Arc<RouteTable>,
    config: Arc<AppConfig>,
}

impl Application {
    pub fn new(routes: Vec<Route>, config: AppConfig) -> Result<Self, BuildError> {
        let routes = RouteTable::new(routes)?;

        if let Some(uri) = config.csp_policy.report_uri() {
            if routes.contains(uri) || is_under_static_prefix(uri) {
                return Err(BuildError::ReportUriCollision(uri.to_string()));
            }
        }

        tracing::info!(
            routes = routes.len(),
            debug = config.debug,
            csp_header = %config.csp_policy.header_name(),
            "Application constructed"
        );

        Ok(Self {
            routes: Arc::new(routes),
            config: Arc::new(config),
        })
    }

    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    pub fn debug(&self) -> bool {
        self.config.debug
    }
}
