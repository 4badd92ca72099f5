//! End-to-end behaviour of the page routes and the CSP header.

use axum::body::Body;
use axum::http::{header, Method, StatusCode};

use film_site::http::X_REQUEST_ID;
use film_site::registrar::{CONTENT_PATHS, NO_SUPPORT_PATH, NO_WEBGL_PATH};

mod common;

#[tokio::test]
async fn content_paths_serve_the_app_shell() {
    let assets = tempfile::tempdir().unwrap();
    let router = common::router(common::test_config(false, assets.path()));

    for path in CONTENT_PATHS {
        let response = common::get(&router, path).await;
        assert_eq!(response.status(), StatusCode::OK, "status for {path}");
        let body = common::body_string(response).await;
        assert!(body.contains(r#"src="/static/main.js""#), "app shell for {path}");
    }
}

#[tokio::test]
async fn special_paths_use_their_handlers() {
    let assets = tempfile::tempdir().unwrap();
    let router = common::router(common::test_config(false, assets.path()));

    let body = common::body_string(common::get(&router, NO_SUPPORT_PATH).await).await;
    assert!(body.contains("not supported"));

    let body = common::body_string(common::get(&router, NO_WEBGL_PATH).await).await;
    assert!(body.contains("needs WebGL"));
}

#[tokio::test]
async fn unknown_path_is_404_with_policy() {
    let assets = tempfile::tempdir().unwrap();
    let router = common::router(common::test_config(false, assets.path()));

    let response = common::get(&router, "/film/extra").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response
        .headers()
        .contains_key(header::CONTENT_SECURITY_POLICY));
}

#[tokio::test]
async fn non_get_is_405() {
    let assets = tempfile::tempdir().unwrap();
    let router = common::router(common::test_config(false, assets.path()));

    let response = common::send(&router, Method::POST, "/about", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
}

#[tokio::test]
async fn head_is_served_like_get() {
    let assets = tempfile::tempdir().unwrap();
    let router = common::router(common::test_config(false, assets.path()));

    let response = common::send(&router, Method::HEAD, "/film", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::CONTENT_SECURITY_POLICY));
}

#[tokio::test]
async fn enforcing_policy_outside_debug() {
    let assets = tempfile::tempdir().unwrap();
    let router = common::router(common::test_config(false, assets.path()));

    let response = common::get(&router, "/").await;
    let headers = response.headers();

    let csp = headers[header::CONTENT_SECURITY_POLICY].to_str().unwrap();
    assert!(csp.starts_with("object-src 'none'; style-src "));
    assert!(csp.contains("script-src 'unsafe-eval' 'unsafe-inline' 'self' "));
    assert!(csp.ends_with("report-uri /csp"));
    assert!(!headers.contains_key(header::CONTENT_SECURITY_POLICY_REPORT_ONLY));

    assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
    assert!(headers.contains_key(X_REQUEST_ID));
}

#[tokio::test]
async fn report_only_policy_in_debug() {
    let assets = tempfile::tempdir().unwrap();
    let router = common::router(common::test_config(true, assets.path()));

    let response = common::get(&router, "/tech").await;
    let headers = response.headers();

    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY_REPORT_ONLY));
    assert!(!headers.contains_key(header::CONTENT_SECURITY_POLICY));
    assert!(!headers.contains_key(header::STRICT_TRANSPORT_SECURITY));

    let body = common::body_string(response).await;
    assert!(body.contains("window.DEBUG = true"));
}

#[tokio::test]
async fn each_request_gets_its_own_nonce() {
    let assets = tempfile::tempdir().unwrap();
    let router = common::router(common::test_config(false, assets.path()));

    let first = common::body_string(common::get(&router, "/").await).await;
    let second = common::body_string(common::get(&router, "/").await).await;

    let nonce = |html: &str| {
        let start = html.find(r#"nonce=""#).unwrap() + 7;
        html[start..start + 32].to_string()
    };
    assert_ne!(nonce(&first), nonce(&second));
}

#[tokio::test]
async fn csp_reports_are_accepted() {
    let assets = tempfile::tempdir().unwrap();
    let router = common::router(common::test_config(false, assets.path()));

    let report = r#"{"csp-report":{"document-uri":"https://example.com/","violated-directive":"script-src"}}"#;
    let response = common::send(&router, Method::POST, "/csp", Body::from(report)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = common::send(&router, Method::POST, "/csp", Body::from("nonsense")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_reports_are_rejected() {
    let assets = tempfile::tempdir().unwrap();
    let mut config = common::test_config(false, assets.path());
    config.security.max_report_bytes = 16;
    let router = common::router(config);

    let report = r#"{"csp-report":{"document-uri":"https://example.com/"}}"#;
    let response = common::send(&router, Method::POST, "/csp", Body::from(report)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn static_assets_carry_the_policy() {
    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("main.css"), "body{}").unwrap();
    let router = common::router(common::test_config(false, assets.path()));

    let response = common::get(&router, "/static/main.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::CONTENT_SECURITY_POLICY));
    assert_eq!(common::body_string(response).await, "body{}");
}
