//! Configuration schema types
//!
//! This module defines the configuration structure for booker-export.

use crate::config::SecretString;
use crate::domain::{default_locations, Location};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime environment
///
/// `test` runs a visible browser so flows can be watched; `production` runs
/// headless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local runs against a visible browser
    #[default]
    Test,
    /// Scheduled runs against a headless browser
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!(
                "Invalid environment '{other}'. Must be one of: test, production"
            )),
        }
    }
}

/// Main booker-export configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookerExportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (test, production)
    #[serde(default)]
    pub environment: Environment,

    /// Booker account credentials and URLs
    pub booker: BookerConfig,

    /// WebDriver session settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Export flow settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Business locations keyed by short name
    #[serde(default = "default_locations")]
    pub locations: BTreeMap<String, Location>,

    /// Analytics sink configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BookerExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.booker.validate()?;
        self.browser.validate()?;
        self.export.validate()?;

        // Orders wait twice the base wait for a download
        let ceiling = self.application.invocation_timeout_secs;
        if self.export.wait_time_secs.saturating_mul(2) >= ceiling {
            return Err(format!(
                "export.wait_time_secs ({}) doubled for orders must be below application.invocation_timeout_secs ({ceiling})",
                self.export.wait_time_secs
            ));
        }
        if self.export.link_refresh_wait_secs >= ceiling {
            return Err(format!(
                "export.link_refresh_wait_secs ({}) must be below application.invocation_timeout_secs ({ceiling})",
                self.export.link_refresh_wait_secs
            ));
        }

        if self.locations.is_empty() {
            return Err("at least one [locations.<name>] table is required".to_string());
        }
        if !self.locations.contains_key(&self.export.customers_location) {
            return Err(format!(
                "export.customers_location '{}' is not a configured location. Known locations: {}",
                self.export.customers_location,
                self.location_names().join(", ")
            ));
        }

        self.analytics.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Looks up a location by its configured short name
    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    /// Names of all configured locations
    pub fn location_names(&self) -> Vec<&str> {
        self.locations.keys().map(String::as_str).collect()
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (leave exports in the scratch directory)
    #[serde(default)]
    pub dry_run: bool,

    /// Hard ceiling for a whole invocation in seconds
    #[serde(default = "default_invocation_timeout_secs")]
    pub invocation_timeout_secs: u64,

    /// URL probed before opening a browser session
    #[serde(default = "default_connectivity_check_url")]
    pub connectivity_check_url: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        if self.invocation_timeout_secs == 0 {
            return Err("application.invocation_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
            invocation_timeout_secs: default_invocation_timeout_secs(),
            connectivity_check_url: default_connectivity_check_url(),
        }
    }
}

/// Booker account configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookerConfig {
    /// Brand account name entered on the first sign-in step
    pub account: String,

    /// Username for the second sign-in step
    pub username: String,

    /// Password for the second sign-in step
    /// Stored securely in memory and automatically zeroized on drop
    pub password: SecretString,

    /// IANA time zone the Booker UI renders timestamps in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Page URLs
    #[serde(default)]
    pub urls: BookerUrls,
}

impl BookerConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.account.trim().is_empty() {
            return Err("booker.account cannot be empty".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("booker.username cannot be empty".to_string());
        }
        if self.password.expose_secret().is_empty() {
            return Err("booker.password cannot be empty".to_string());
        }
        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(format!(
                "booker.timezone '{}' is not a valid IANA time zone",
                self.timezone
            ));
        }
        self.urls.validate()
    }
}

/// Booker page URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookerUrls {
    /// Sign-in page
    #[serde(default = "default_signin_url")]
    pub signin: String,

    /// Brand-level locations listing
    #[serde(default = "default_locations_url")]
    pub locations: String,

    /// Customer search page
    #[serde(default = "default_customers_url")]
    pub customers: String,

    /// Appointment search page
    #[serde(default = "default_appointments_url")]
    pub appointments: String,

    /// Order search page
    #[serde(default = "default_orders_url")]
    pub orders: String,
}

impl BookerUrls {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("signin", &self.signin),
            ("locations", &self.locations),
            ("customers", &self.customers),
            ("appointments", &self.appointments),
            ("orders", &self.orders),
        ] {
            url::Url::parse(value)
                .map_err(|e| format!("booker.urls.{name} is not a valid URL ({value}): {e}"))?;
        }
        Ok(())
    }
}

impl Default for BookerUrls {
    fn default() -> Self {
        Self {
            signin: default_signin_url(),
            locations: default_locations_url(),
            customers: default_customers_url(),
            appointments: default_appointments_url(),
            orders: default_orders_url(),
        }
    }
}

/// WebDriver session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// WebDriver server URL (chromedriver)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Force headless mode regardless of environment
    #[serde(default)]
    pub headless: Option<bool>,

    /// Scratch download directory; a temporary directory is used when unset
    #[serde(default)]
    pub download_dir: Option<String>,

    /// Extra Chrome command-line arguments
    #[serde(default = "default_chrome_args")]
    pub chrome_args: Vec<String>,
}

impl BrowserConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.webdriver_url.starts_with("http://") && !self.webdriver_url.starts_with("https://")
        {
            return Err("browser.webdriver_url must start with http:// or https://".to_string());
        }
        Ok(())
    }

    /// Whether the session should run headless in the given environment
    pub fn is_headless(&self, environment: &Environment) -> bool {
        self.headless
            .unwrap_or(*environment == Environment::Production)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: None,
            download_dir: None,
            chrome_args: default_chrome_args(),
        }
    }
}

/// Export flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Root of the destination tree; exports stay in the scratch directory when unset
    #[serde(default)]
    pub destination_dir: Option<String>,

    /// Size of each chunked export window in days
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Default element and download wait in seconds
    #[serde(default = "default_wait_time_secs")]
    pub wait_time_secs: u64,

    /// Download directory polling interval in milliseconds
    #[serde(default = "default_file_poll_interval_ms")]
    pub file_poll_interval_ms: u64,

    /// Element polling interval in milliseconds
    #[serde(default = "default_element_poll_interval_ms")]
    pub element_poll_interval_ms: u64,

    /// Pause after clicking a location impersonation link in milliseconds
    #[serde(default = "default_location_switch_delay_ms")]
    pub location_switch_delay_ms: u64,

    /// Location the customers flow impersonates
    #[serde(default = "default_customers_location")]
    pub customers_location: String,

    /// Refresh attempts while waiting for a customer export link
    #[serde(default = "default_link_refresh_attempts")]
    pub link_refresh_attempts: u32,

    /// Wait per refresh attempt for a customer export link in seconds
    #[serde(default = "default_link_refresh_wait_secs")]
    pub link_refresh_wait_secs: u64,

    /// Wait for the processing overlay after setting the orders date range
    #[serde(default = "default_true")]
    pub orders_wait_for_overlay: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.window_days == 0 || self.window_days > 366 {
            return Err(format!(
                "export.window_days must be between 1 and 366, got {}",
                self.window_days
            ));
        }
        if self.wait_time_secs == 0 {
            return Err("export.wait_time_secs must be greater than 0".to_string());
        }
        if self.file_poll_interval_ms == 0 || self.element_poll_interval_ms == 0 {
            return Err("export poll intervals must be greater than 0".to_string());
        }
        if self.link_refresh_attempts == 0 {
            return Err("export.link_refresh_attempts must be greater than 0".to_string());
        }
        if let Some(dir) = &self.destination_dir {
            if dir.trim().is_empty() {
                return Err("export.destination_dir cannot be empty when set".to_string());
            }
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            destination_dir: None,
            window_days: default_window_days(),
            wait_time_secs: default_wait_time_secs(),
            file_poll_interval_ms: default_file_poll_interval_ms(),
            element_poll_interval_ms: default_element_poll_interval_ms(),
            location_switch_delay_ms: default_location_switch_delay_ms(),
            customers_location: default_customers_location(),
            link_refresh_attempts: default_link_refresh_attempts(),
            link_refresh_wait_secs: default_link_refresh_wait_secs(),
            orders_wait_for_overlay: true,
        }
    }
}

/// Analytics sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Send flow events to the analytics endpoint
    #[serde(default)]
    pub enabled: bool,

    /// Segment write key
    #[serde(default)]
    pub write_key: Option<SecretString>,

    /// Batch endpoint
    #[serde(default = "default_analytics_endpoint")]
    pub endpoint: String,

    /// User id attached to tracked events
    #[serde(default = "default_analytics_user_id")]
    pub user_id: String,

    /// Maximum time spent flushing at shutdown in seconds
    #[serde(default = "default_flush_timeout_secs")]
    pub flush_timeout_secs: u64,
}

impl AnalyticsConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if !self.enabled {
            return Ok(());
        }
        if self
            .write_key
            .as_ref()
            .map(|k| k.expose_secret().is_empty())
            .unwrap_or(true)
        {
            return Err("analytics.write_key is required when analytics is enabled".to_string());
        }
        url::Url::parse(&self.endpoint)
            .map_err(|e| format!("analytics.endpoint is not a valid URL: {e}"))?;
        if self.flush_timeout_secs == 0 {
            return Err("analytics.flush_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            write_key: None,
            endpoint: default_analytics_endpoint(),
            user_id: default_analytics_user_id(),
            flush_timeout_secs: default_flush_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_invocation_timeout_secs() -> u64 {
    900
}

fn default_connectivity_check_url() -> String {
    "https://www.google.com".to_string()
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

fn default_signin_url() -> String {
    "https://signin.booker.com/".to_string()
}

fn default_locations_url() -> String {
    "https://app.secure-booker.com/App/BrandAdmin/Spas/SearchSpas.aspx".to_string()
}

fn default_customers_url() -> String {
    "https://app.secure-booker.com/App/SpaAdmin/Customers/SearchCustomers.aspx".to_string()
}

fn default_appointments_url() -> String {
    "https://app.secure-booker.com/App/SpaAdmin/Appointments/SearchAppointments.aspx".to_string()
}

fn default_orders_url() -> String {
    "https://app.secure-booker.com/App/SpaAdmin/Orders/Orders/SearchOrders.aspx".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_chrome_args() -> Vec<String> {
    vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--window-size=1920,1080".to_string(),
    ]
}

fn default_window_days() -> u32 {
    11
}

fn default_wait_time_secs() -> u64 {
    60
}

fn default_file_poll_interval_ms() -> u64 {
    1000
}

fn default_element_poll_interval_ms() -> u64 {
    500
}

fn default_location_switch_delay_ms() -> u64 {
    1000
}

fn default_customers_location() -> String {
    "ll".to_string()
}

fn default_link_refresh_attempts() -> u32 {
    10
}

fn default_link_refresh_wait_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_analytics_endpoint() -> String {
    "https://api.segment.io/v1/batch".to_string()
}

fn default_analytics_user_id() -> String {
    "booker-export".to_string()
}

fn default_flush_timeout_secs() -> u64 {
    10
}

fn default_local_path() -> String {
    "/var/log/booker-export".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
