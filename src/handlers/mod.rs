//! Request handlers.
//!
//! Every route points at something implementing [`RequestHandler`]. The
//! handlers are stateless; what they need per request (nonce, debug flag,
//! templates) arrives through [`RequestContext`].

pub mod pages;
pub mod templates;

use axum::http::Method;
use axum::response::Response;

pub use pages::{BlockHandler, NoWebGlHandler, RootHandler};
pub use templates::{Page, TemplateError, Templates};

/// Everything a handler may look at while answering one request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub method: &'a Method,
    pub nonce: Option<&'a str>,
    pub debug: bool,
    pub templates: &'a Templates,
}

/// The capability "given an incoming request, produce a response".
pub trait RequestHandler: Send + Sync + std::fmt::Debug {
    /// Short label used in logs and metrics.
    fn name(&self) -> &'static str;

    fn handle(&self, ctx: &RequestContext<'_>) -> Response;
}
