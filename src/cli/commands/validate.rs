//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the booker-export configuration file.

use super::{EXIT_CONFIG, EXIT_SUCCESS};
use crate::config::load_config;
use crate::core::export::FlowSettings;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let settings = match FlowSettings::from_config(&config) {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Account: {}", config.booker.account);
        println!("  Time Zone: {}", settings.timezone);
        println!("  WebDriver: {}", config.browser.webdriver_url);
        println!(
            "  Headless: {}",
            config.browser.is_headless(&config.environment)
        );
        println!(
            "  Destination: {}",
            config
                .export
                .destination_dir
                .as_deref()
                .unwrap_or("(none, files stay in the scratch directory)")
        );
        println!("  Window Size: {} days", config.export.window_days);
        println!("  Wait Time: {}s", config.export.wait_time_secs);
        println!("  Customers Location: {}", config.export.customers_location);
        println!("  Locations:");
        for (name, location) in &config.locations {
            println!(
                "    - {name}: site {} (appointments view {}, orders view {})",
                location.id, location.appointments_view_id, location.orders_view_id
            );
        }
        println!(
            "  Analytics: {}",
            if config.analytics.enabled {
                config.analytics.endpoint.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let args = ValidateArgs {};
        let code = args.execute("/nonexistent/booker.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_unknown_customers_location_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[booker]
account = "brand"
username = "user"
password = "pass"

[export]
customers_location = "nowhere"
"#
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
