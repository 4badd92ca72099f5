//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request id, tracing, timeout, limits, CSP,
//!   hardening headers)
//! - Dispatch page requests through the route table
//! - Serve static assets and accept CSP reports
//! - Bind server to listener and shut down gracefully

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer, services::ServeDir, set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::app::{Application, BuildError};
use crate::handlers::{RequestContext, Templates};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::routing::RouteTable;
use crate::security::{csp, headers, report};

/// Prefix under which static assets are served.
pub const STATIC_PREFIX: &str = "/static";

/// True for `/static` itself and anything beneath it.
pub fn is_under_static_prefix(path: &str) -> bool {
    path.strip_prefix(STATIC_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub templates: Arc<Templates>,
    pub debug: bool,
}

/// HTTP server for the site.
pub struct SiteServer {
    router: Router,
    app: Application,
}

impl SiteServer {
    /// Create a new server, loading page templates from disk.
    pub fn new(app: Application) -> Result<Self, BuildError> {
        let dir = &app.config().settings.templates.dir;
        let templates = Templates::load(Path::new(dir))?;
        Ok(Self::with_templates(app, templates))
    }

    /// Create a new server with already-loaded templates.
    pub fn with_templates(app: Application, templates: Templates) -> Self {
        let router = Self::build_router(&app, templates);
        Self { router, app }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(app: &Application, templates: Templates) -> Router {
        let config = app.config();
        let settings = &config.settings;
        let policy = Arc::new(config.csp_policy.clone());

        let state = AppState {
            routes: Arc::clone(app.routes()),
            templates: Arc::new(templates),
            debug: config.debug,
        };

        let mut router = Router::new();
        if let Some(report_uri) = policy.report_uri() {
            router = router.route(
                report_uri,
                post(report::receive_report)
                    .layer(DefaultBodyLimit::max(settings.security.max_report_bytes)),
            );
        }
        let mut router = router.fallback(dispatch).with_state(state);

        if settings.static_files.enabled {
            router = router.nest_service(STATIC_PREFIX, ServeDir::new(&settings.static_files.dir));
        }

        if settings.security.enable_headers {
            for (name, value) in
                headers::hardening_headers(config.debug, settings.security.hsts_max_age_secs)
            {
                router = router.layer(SetResponseHeaderLayer::if_not_present(name, value));
            }
        }

        router
            .layer(middleware::from_fn_with_state(policy, csp::csp_middleware))
            .layer(RequestBodyLimitLayer::new(settings.security.max_body_size))
            .layer(request_timeout_layer(settings.timeouts.request_secs))
            .layer(propagate_request_id_layer())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|req: &Request<Body>| make_request_span(req)),
            )
            .layer(set_request_id_layer())
    }

    /// The assembled router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.app.routes().len(),
            debug = self.app.debug(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

// `TimeoutLayer::new` is deprecated in later tower-http 0.6 releases.
#[allow(deprecated)]
fn request_timeout_layer(secs: u64) -> TimeoutLayer {
    TimeoutLayer::new(Duration::from_secs(secs))
}

/// Fallback handler: look the path up in the route table and let the
/// matched handler answer.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let path = request.uri().path();
    let method = request.method();

    let Some(route) = state.routes.resolve(path) else {
        tracing::debug!(path = %path, "No route matched");
        metrics::record_request("none", StatusCode::NOT_FOUND.as_u16(), start);
        return (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>")).into_response();
    };
    let handler = route.handler();

    if *method != Method::GET && *method != Method::HEAD {
        tracing::debug!(path = %path, method = %method, "Method not allowed");
        metrics::record_request(handler.name(), StatusCode::METHOD_NOT_ALLOWED.as_u16(), start);
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, HeaderValue::from_static("GET, HEAD"))],
        )
            .into_response();
    }

    let ctx = RequestContext {
        path,
        method,
        nonce: csp::request_nonce(&request).map(|n| n.as_str()),
        debug: state.debug,
        templates: &state.templates,
    };
    let response = handler.handle(&ctx);

    tracing::debug!(
        path = %path,
        handler = handler.name(),
        status = response.status().as_u16(),
        "Request handled"
    );
    metrics::record_request(handler.name(), response.status().as_u16(), start);
    response
}
