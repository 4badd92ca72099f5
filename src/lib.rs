//! Film website server library.

pub mod app;
pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registrar;
pub mod routing;
pub mod security;

pub use app::{AppConfig, Application, BuildError};
pub use config::SiteConfig;
pub use http::SiteServer;
pub use lifecycle::Shutdown;
