//! Configuration management for booker-export.
//!
//! # Overview
//!
//! booker-export reads a single TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment overrides for credentials and deployment paths
//! - Default values for every optional setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level, dry run, invocation timeout
//! - [`BookerConfig`] - Account credentials, time zone, page URLs
//! - [`BrowserConfig`] - WebDriver endpoint, headless mode, scratch directory
//! - [`ExportConfig`] - Window size, waits, destination tree
//! - [`AnalyticsConfig`] - Segment write key and flush timeout
//! - [`LoggingConfig`] - Rolling JSON log files
//!
//! Locations live under `[locations.<name>]`; when none are declared the
//! two production sites (`ll`, `cda`) are used.
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [booker]
//! account = "${BOOKER_ACCOUNT}"
//! username = "${BOOKER_USERNAME}"
//! password = "${BOOKER_PASSWORD}"
//!
//! [browser]
//! webdriver_url = "http://localhost:9515"
//!
//! [export]
//! destination_dir = "/data/booker"
//!
//! [locations.ll]
//! id = "36085"
//! appointments_view_id = 57651
//! orders_view_id = 57650
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_str};
pub use schema::{
    AnalyticsConfig, ApplicationConfig, BookerConfig, BookerExportConfig, BookerUrls,
    BrowserConfig, Environment, ExportConfig, LoggingConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
