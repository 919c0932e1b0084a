//! Integration tests for configuration loading and validation
//!
//! Placeholders use variable names unique to this file so parallel tests do
//! not see each other's environment.

use booker_export::config::{load_config, BookerExportConfig};
use booker_export::core::export::FlowSettings;
use secrecy::ExposeSecret;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use test_case::test_case;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    std::env::set_var("BOOKER_IT_COMPLETE_PASSWORD", "s3cret");
    let file = write_config(
        r#"
environment = "production"

[application]
log_level = "debug"
invocation_timeout_secs = 600

[booker]
account = "brand"
username = "reports@example.com"
password = "${BOOKER_IT_COMPLETE_PASSWORD}"
timezone = "America/Denver"

[browser]
webdriver_url = "http://selenium:4444"
download_dir = "/tmp/booker-downloads"

[export]
destination_dir = "/data/booker"
window_days = 7
customers_location = "north"
orders_wait_for_overlay = false

[locations.north]
id = "11111"
appointments_view_id = 100
orders_view_id = 101

[locations.south]
id = "22222"
appointments_view_id = 200
orders_view_id = 201

[analytics]
enabled = true
write_key = "wk_live"
"#,
    );

    let config = load_config(file.path()).unwrap();
    std::env::remove_var("BOOKER_IT_COMPLETE_PASSWORD");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.booker.password.expose_secret().as_ref(), "s3cret");
    assert_eq!(config.location_names(), vec!["north", "south"]);
    assert_eq!(config.location("south").unwrap().orders_view_id.value(), 201);
    assert!(config.browser.is_headless(&config.environment));

    let settings = FlowSettings::from_config(&config).unwrap();
    assert_eq!(settings.timezone, chrono_tz::America::Denver);
    assert_eq!(settings.window_days, 7);
    assert_eq!(settings.customers_location.id.as_str(), "11111");
    assert_eq!(settings.waits.wait_time, Duration::from_secs(60));
    assert!(!settings.orders_wait_for_overlay);
}

#[test]
fn test_minimal_config_uses_default_locations() {
    let file = write_config(
        r#"
[booker]
account = "brand"
username = "user"
password = "pass"
"#,
    );

    let config: BookerExportConfig = load_config(file.path()).unwrap();
    assert_eq!(config.location_names(), vec!["cda", "ll"]);
    assert_eq!(config.export.window_days, 11);
    assert!(!config.analytics.enabled);
    assert!(!config.browser.is_headless(&config.environment));
}

#[test]
fn test_unset_placeholder_is_reported() {
    let file = write_config(
        r#"
[booker]
account = "brand"
username = "user"
password = "${BOOKER_IT_NEVER_SET_PASSWORD}"
"#,
    );

    let err = load_config(file.path()).unwrap_err().to_string();
    assert!(err.contains("BOOKER_IT_NEVER_SET_PASSWORD"));
}

#[test]
fn test_customers_location_must_exist() {
    let file = write_config(
        r#"
[booker]
account = "brand"
username = "user"
password = "pass"

[export]
customers_location = "west"
"#,
    );

    let err = load_config(file.path()).unwrap_err().to_string();
    assert!(err.contains("customers_location 'west'"));
}

#[test]
fn test_enabled_analytics_requires_write_key() {
    let file = write_config(
        r#"
[booker]
account = "brand"
username = "user"
password = "pass"

[analytics]
enabled = true
"#,
    );

    let err = load_config(file.path()).unwrap_err().to_string();
    assert!(err.contains("analytics.write_key"));
}

#[test]
fn test_missing_file() {
    let err = load_config("/nonexistent/booker.toml").unwrap_err().to_string();
    assert!(err.contains("Configuration file not found"));
}

#[test_case(900, 600, 300, "export.wait_time_secs (600)"; "orders wait past ceiling")]
#[test_case(900, 450, 300, "export.wait_time_secs (450)"; "orders wait equal to ceiling")]
#[test_case(900, 60, 1200, "export.link_refresh_wait_secs (1200)"; "link wait past ceiling")]
#[test_case(300, 60, 300, "export.link_refresh_wait_secs (300)"; "link wait equal to ceiling")]
fn test_waits_must_fit_invocation_timeout(ceiling: u64, wait: u64, link_wait: u64, fragment: &str) {
    let file = write_config(&format!(
        r#"
[application]
invocation_timeout_secs = {ceiling}

[booker]
account = "brand"
username = "user"
password = "pass"

[export]
wait_time_secs = {wait}
link_refresh_wait_secs = {link_wait}
"#
    ));

    let err = load_config(file.path()).unwrap_err().to_string();
    assert!(err.contains(fragment), "{err} does not mention {fragment}");
    assert!(err.contains(&format!("application.invocation_timeout_secs ({ceiling})")));
}

#[test]
fn test_waits_just_below_invocation_timeout() {
    let file = write_config(
        r#"
[application]
invocation_timeout_secs = 900

[booker]
account = "brand"
username = "user"
password = "pass"

[export]
wait_time_secs = 449
link_refresh_wait_secs = 899
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.export.wait_time_secs, 449);
    assert_eq!(config.export.link_refresh_wait_secs, 899);
}
