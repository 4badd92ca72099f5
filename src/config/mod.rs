//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SiteConfig (validated, immutable)
//!     → registrar builds the CSP policy and route table from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CspConfig, CspDirectiveConfig, ListenerConfig, ObservabilityConfig, SecurityConfig,
    SiteConfig, StaticFilesConfig, TemplateConfig, TimeoutConfig,
};
pub use validation::ValidationError;
