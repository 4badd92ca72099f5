//! Route & config registrar.
//!
//! Builds the route table and the `csp_policy` configuration from literal
//! constants and hands both to [`Application::new`]. Everything here is
//! deterministic: calling it twice yields equal values.

use std::sync::Arc;

use crate::app::{AppConfig, Application, BuildError};
use crate::config::{CspConfig, SiteConfig};
use crate::handlers::{BlockHandler, NoWebGlHandler, RequestHandler, RootHandler};
use crate::routing::Route;
use crate::security::{CspPolicy, PolicyError};

/// Paths served by the app shell; the client renders the section.
pub const CONTENT_PATHS: [&str; 8] = [
    "/",
    "/film",
    "/about",
    "/cast",
    "/tech",
    "/credits",
    "/faq",
    "/making-of",
];

pub const NO_SUPPORT_PATH: &str = "/no-support";
pub const NO_WEBGL_PATH: &str = "/no-webgl";
pub const CSP_REPORT_PATH: &str = "/csp";

// Disallow Flash and other plugins.
const OBJECT_SRC: &str = "'none'";

const STYLE_SRC: &str = "'self' 'unsafe-inline' https://fonts.googleapis.com \
    https://*.gstatic.com https://tagmanager.google.com";

const SCRIPT_SRC: &str = "'unsafe-eval' 'unsafe-inline' 'self' tagmanager.google.com \
    *.googleanalytics.com *.googleadservices.com *.google-analytics.com maps.google.com \
    *.googletagmanager.com maps.gstatic.com cdnjs.cloudflare.com code.jquery.com \
    maps.googleapis.com";

/// The unauthenticated route table, in match order.
pub fn unauthenticated_routes() -> Vec<Route> {
    let root: Arc<dyn RequestHandler> = Arc::new(RootHandler);

    let mut routes: Vec<Route> = CONTENT_PATHS
        .iter()
        .map(|path| Route::new(*path, Arc::clone(&root)))
        .collect();
    routes.push(Route::new(NO_SUPPORT_PATH, Arc::new(BlockHandler)));
    routes.push(Route::new(NO_WEBGL_PATH, Arc::new(NoWebGlHandler)));
    routes
}

/// The built-in policy. Violations are only reported while `debug` is on.
pub fn default_csp_policy(debug: bool) -> Result<CspPolicy, PolicyError> {
    CspPolicy::builder()
        .directive("object-src", OBJECT_SRC)
        .directive("style-src", STYLE_SRC)
        .directive("script-src", SCRIPT_SRC)
        .report_uri(CSP_REPORT_PATH)
        .report_only(debug)
        .build()
}

/// A policy from the config file. `report_only` still follows `debug`.
pub fn configured_csp_policy(csp: &CspConfig, debug: bool) -> Result<CspPolicy, PolicyError> {
    let mut builder = CspPolicy::builder()
        .nonce_placeholder(csp.nonce_placeholder.clone())
        .report_only(debug);
    for directive in &csp.directives {
        builder = builder.directive(directive.name.clone(), &directive.value);
    }
    if let Some(uri) = &csp.report_uri {
        builder = builder.report_uri(uri.clone());
    }
    builder.build()
}

/// The configuration mapping for `settings`.
pub fn app_config(settings: SiteConfig) -> Result<AppConfig, PolicyError> {
    let debug = settings.debug;
    let csp_policy = match &settings.csp {
        Some(csp) => configured_csp_policy(csp, debug)?,
        None => default_csp_policy(debug)?,
    };

    Ok(AppConfig {
        csp_policy,
        debug,
        settings,
    })
}

/// Build the application: routes plus configuration.
pub fn build(settings: SiteConfig) -> Result<Application, BuildError> {
    Application::new(unauthenticated_routes(), app_config(settings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CspDirectiveConfig;

    fn table(routes: &[Route]) -> Vec<(String, &'static str)> {
        routes
            .iter()
            .map(|r| (r.pattern().to_string(), r.handler().name()))
            .collect()
    }

    #[test]
    fn every_path_has_one_handler() {
        let routes = unauthenticated_routes();
        assert_eq!(routes.len(), 10);

        for (path, handler) in table(&routes) {
            let expected = match path.as_str() {
                NO_SUPPORT_PATH => "block",
                NO_WEBGL_PATH => "no_webgl",
                _ => "root",
            };
            assert_eq!(handler, expected, "handler for {path}");
        }
    }

    #[test]
    fn routes_are_deterministic() {
        assert_eq!(
            table(&unauthenticated_routes()),
            table(&unauthenticated_routes())
        );
    }

    #[test]
    fn report_only_tracks_debug() {
        for debug in [false, true] {
            let mut settings = SiteConfig::default();
            settings.debug = debug;
            let config = app_config(settings).unwrap();
            assert_eq!(config.csp_policy.report_only(), debug);
            assert_eq!(config.debug, debug);
        }
    }

    #[test]
    fn config_mapping_is_idempotent() {
        let a = serde_json::to_string(&app_config(SiteConfig::default()).unwrap()).unwrap();
        let b = serde_json::to_string(&app_config(SiteConfig::default()).unwrap()).unwrap();
        assert_eq!(a, b);

        let value: serde_json::Value = serde_json::from_str(&a).unwrap();
        let csp = &value["csp_policy"];
        assert_eq!(csp["object-src"], "'none'");
        assert_eq!(csp["report-uri"], "/csp");
        assert_eq!(csp["reportOnly"], false);
        assert!(csp["script-src"]
            .as_str()
            .unwrap()
            .ends_with("code.jquery.com maps.googleapis.com"));
    }

    #[test]
    fn default_policy_header() {
        let policy = default_csp_policy(false).unwrap();
        assert!(!policy.uses_nonce());
        let value = policy.header_value(Some("ignored"));
        assert!(value.starts_with("object-src 'none'; style-src 'self' 'unsafe-inline'"));
        assert!(value.ends_with("; report-uri /csp"));
        assert!(!value.contains("  "));
    }

    #[test]
    fn configured_policy_replaces_builtin() {
        let mut settings = SiteConfig::default();
        settings.debug = true;
        settings.csp = Some(CspConfig {
            directives: vec![CspDirectiveConfig {
                name: "script-src".into(),
                value: "{nonce} 'strict-dynamic'".into(),
            }],
            report_uri: None,
            ..CspConfig::default()
        });

        let config = app_config(settings).unwrap();
        assert!(config.csp_policy.report_only());
        assert!(config.csp_policy.uses_nonce());
        assert_eq!(config.csp_policy.directive("object-src"), None);
        assert_eq!(
            config.csp_policy.header_value(Some("ab")),
            "script-src 'nonce-ab' 'strict-dynamic'"
        );
    }

    #[test]
    fn report_uri_must_not_shadow_a_page() {
        let mut settings = SiteConfig::default();
        settings.csp = Some(CspConfig {
            report_uri: Some("/film".into()),
            ..CspConfig::default()
        });

        let err = build(settings).unwrap_err();
        assert!(matches!(err, BuildError::ReportUriCollision(uri) if uri == "/film"));
    }

    #[test]
    fn report_uri_must_not_shadow_static_assets() {
        for uri in ["/static", "/static/csp"] {
            let mut settings = SiteConfig::default();
            settings.csp = Some(CspConfig {
                report_uri: Some(uri.into()),
                ..CspConfig::default()
            });

            let err = build(settings).unwrap_err();
            assert!(matches!(err, BuildError::ReportUriCollision(ref u) if u == uri), "{uri}");
        }
    }

    #[test]
    fn report_uri_route_syntax_rejected() {
        for uri in ["/:csp", "/{x}"] {
            let mut settings = SiteConfig::default();
            settings.csp = Some(CspConfig {
                report_uri: Some(uri.into()),
                ..CspConfig::default()
            });

            let err = build(settings).unwrap_err();
            assert!(
                matches!(err, BuildError::Policy(PolicyError::InvalidReportUri(ref u)) if u == uri),
                "{uri}"
            );
        }
    }
}
