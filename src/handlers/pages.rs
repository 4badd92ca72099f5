//! Page handlers: the app shell, the unsupported-browser page and the
//! no-WebGL page.

use axum::http::{header, HeaderValue};
use axum::response::{Html, IntoResponse, Response};

use super::{Page, RequestContext, RequestHandler};

fn render_page(page: Page, ctx: &RequestContext<'_>) -> Response {
    let html = ctx.templates.render(page, ctx.nonce, ctx.debug);
    let mut response = Html(html).into_response();
    // Pages embed a per-request nonce and must not be cached.
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

/// Serves the single-page app shell; the client picks the section from
/// the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootHandler;

impl RequestHandler for RootHandler {
    fn name(&self) -> &'static str {
        "root"
    }

    fn handle(&self, ctx: &RequestContext<'_>) -> Response {
        render_page(Page::Root, ctx)
    }
}

/// Tells visitors their browser is not supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockHandler;

impl RequestHandler for BlockHandler {
    fn name(&self) -> &'static str {
        "block"
    }

    fn handle(&self, ctx: &RequestContext<'_>) -> Response {
        render_page(Page::NoSupport, ctx)
    }
}

/// Landing page for clients without WebGL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWebGlHandler;

impl RequestHandler for NoWebGlHandler {
    fn name(&self) -> &'static str {
        "no_webgl"
    }

    fn handle(&self, ctx: &RequestContext<'_>) -> Response {
        render_page(Page::NoWebGl, ctx)
    }
}
