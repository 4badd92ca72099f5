//! Shared utilities for integration tests.

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use tower::ServiceExt;

use film_site::handlers::Templates;
use film_site::{registrar, SiteConfig, SiteServer};

/// Config pointing static assets at `static_dir`.
pub fn test_config(debug: bool, static_dir: &std::path::Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.debug = debug;
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.static_files.dir = static_dir.display().to_string();
    config
}

#[allow(dead_code)]
/// Router for `config`, with built-in page templates.
pub fn router(config: SiteConfig) -> Router {
    let app = registrar::build(config).unwrap();
    SiteServer::with_templates(app, Templates::builtin()).router()
}

#[allow(dead_code)]
/// Drive one request through the router.
pub async fn send(router: &Router, method: Method, path: &str, body: Body) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/csp-report")
        .body(body)
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn get(router: &Router, path: &str) -> Response<Body> {
    send(router, Method::GET, path, Body::empty()).await
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
