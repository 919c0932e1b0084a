//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "booker.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing booker-export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - BOOKER_ACCOUNT, BOOKER_USERNAME, BOOKER_PASSWORD");
                println!("     - SEGMENT_WRITE_KEY (optional, enables analytics)");
                println!("  3. Start chromedriver (default http://localhost:9515)");
                println!("  4. Validate configuration: booker-export validate-config");
                println!("  5. Run a task: booker-export run --task test");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# booker-export configuration

environment = "test"

[application]
log_level = "info"
dry_run = false

[booker]
account = "${BOOKER_ACCOUNT}"
username = "${BOOKER_USERNAME}"
password = "${BOOKER_PASSWORD}"
timezone = "America/Los_Angeles"

[browser]
webdriver_url = "http://localhost:9515"

[export]
destination_dir = "/data/booker"
window_days = 11
wait_time_secs = 60
customers_location = "ll"

[locations.ll]
id = "36085"
appointments_view_id = 57651
orders_view_id = 57650

[locations.cda]
id = "51309"
appointments_view_id = 57707
orders_view_id = 57738

[logging]
local_enabled = false
local_path = "/var/log/booker-export"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# booker-export configuration
#
# Values written as ${VAR} are substituted from the environment (a .env file
# in the working directory is loaded first). Environment variables such as
# BOOKER_PASSWORD or BOOKER_DESTINATION_DIR override the file.

# ============================================================================
# Environment
# ============================================================================
# test | production (production runs Chrome headless by default)
environment = "test"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (downloads stay in the scratch directory)
dry_run = false

# Hard ceiling for a whole invocation, in seconds
invocation_timeout_secs = 900

# Probed before a browser session is opened
connectivity_check_url = "https://www.google.com"

# ============================================================================
# Booker Account
# ============================================================================
[booker]
# Brand account name (first sign-in step)
account = "${BOOKER_ACCOUNT}"

# Credentials (second sign-in step)
username = "${BOOKER_USERNAME}"
password = "${BOOKER_PASSWORD}"

# Time zone the Booker UI renders timestamps in
timezone = "America/Los_Angeles"

# Page URLs (production defaults)
# [booker.urls]
# signin = "https://signin.booker.com/"
# locations = "https://app.secure-booker.com/App/BrandAdmin/Spas/SearchSpas.aspx"
# customers = "https://app.secure-booker.com/App/SpaAdmin/Customers/SearchCustomers.aspx"
# appointments = "https://app.secure-booker.com/App/SpaAdmin/Appointments/SearchAppointments.aspx"
# orders = "https://app.secure-booker.com/App/SpaAdmin/Orders/Orders/SearchOrders.aspx"

# ============================================================================
# Browser
# ============================================================================
[browser]
# chromedriver URL
webdriver_url = "http://localhost:9515"

# Force headless mode on or off (default: headless in production only)
# headless = true

# Scratch download directory (default: a temporary directory per run)
# download_dir = "/tmp/booker-downloads"

chrome_args = ["--no-sandbox", "--disable-dev-shm-usage", "--window-size=1920,1080"]

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Root of the destination tree; unset keeps files in the scratch directory
destination_dir = "/data/booker"

# Days per appointments/orders export window
window_days = 11

# Element and download wait, in seconds (orders wait twice as long)
wait_time_secs = 60

# Polling intervals
file_poll_interval_ms = 1000
element_poll_interval_ms = 500

# Pause after switching location
location_switch_delay_ms = 1000

# Location the customers flow runs under
customers_location = "ll"

# Customers export link: reloads and wait per reload
link_refresh_attempts = 10
link_refresh_wait_secs = 300

# Wait for the processing overlay after setting the orders date range
orders_wait_for_overlay = true

# ============================================================================
# Locations
# ============================================================================
# One table per site: SpaID plus the saved report views
[locations.ll]
id = "36085"
appointments_view_id = 57651
orders_view_id = 57650

[locations.cda]
id = "51309"
appointments_view_id = 57707
orders_view_id = 57738

# ============================================================================
# Analytics
# ============================================================================
[analytics]
# Also enabled by setting SEGMENT_WRITE_KEY
enabled = false
# write_key = "${SEGMENT_WRITE_KEY}"
endpoint = "https://api.segment.io/v1/batch"
user_id = "booker-export"
flush_timeout_secs = 10

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files with rotation
local_enabled = false
local_path = "/var/log/booker-export"
local_rotation = "daily"  # daily | hourly
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_str;
    use test_case::test_case;

    fn with_credentials(template: &str) -> String {
        template
            .replace("${BOOKER_ACCOUNT}", "brand")
            .replace("${BOOKER_USERNAME}", "user")
            .replace("${BOOKER_PASSWORD}", "pass")
    }

    #[test_case(InitArgs::generate_minimal_config(); "minimal")]
    #[test_case(InitArgs::generate_config_with_examples(); "with examples")]
    fn test_generated_config_parses(template: String) {
        let config = load_config_str(&with_credentials(&template)).unwrap();
        assert_eq!(config.export.customers_location, "ll");
        assert_eq!(config.location_names(), vec!["cda", "ll"]);
        assert_eq!(config.export.destination_dir.as_deref(), Some("/data/booker"));
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = InitArgs {
            output: file.path().to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_writes_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("booker.toml");
        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: true,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_SUCCESS);
        assert!(std::fs::read_to_string(output)
            .unwrap()
            .contains("[locations.cda]"));
    }
}
