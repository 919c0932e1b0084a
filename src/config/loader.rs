//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BookerExportConfig;
use super::secret::secret_string;
use crate::domain::errors::BookerError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Substitutes `${VAR}` placeholders from the environment
/// 3. Parses the TOML into [`BookerExportConfig`]
/// 4. Applies the well-known environment overrides (`BOOKER_*`, `ENVIRONMENT`, ...)
/// 5. Validates the result
///
/// # Errors
///
/// Returns [`BookerError::Configuration`] if the file is missing or
/// unreadable, a placeholder references an unset variable, the TOML does not
/// parse, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use booker_export::config::load_config;
///
/// let config = load_config("booker.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BookerExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BookerError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BookerError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Same as [`load_config`] for configuration already held in memory
pub fn load_config_str(contents: &str) -> Result<BookerExportConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: BookerExportConfig = toml::from_str(&contents)
        .map_err(|e| BookerError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        BookerError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BookerError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }
            re.replace_all(line, |cap: &regex::Captures<'_>| {
                let var_name = &cap[1];
                match std::env::var(var_name) {
                    Ok(value) => value,
                    Err(_) => {
                        if !missing_vars.iter().any(|v| v == var_name) {
                            missing_vars.push(var_name.to_string());
                        }
                        cap[0].to_string()
                    }
                }
            })
            .into_owned()
        })
        .collect();

    if !missing_vars.is_empty() {
        return Err(BookerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides
///
/// Credentials and deployment-specific paths are usually injected by the
/// scheduler rather than written into the file.
fn apply_env_overrides(config: &mut BookerExportConfig) -> Result<()> {
    if let Ok(val) = std::env::var("BOOKER_ACCOUNT") {
        config.booker.account = val;
    }
    if let Ok(val) = std::env::var("BOOKER_USERNAME") {
        config.booker.username = val;
    }
    if let Ok(val) = std::env::var("BOOKER_PASSWORD") {
        config.booker.password = secret_string(val);
    }
    if let Ok(val) = std::env::var("BOOKER_TIMEZONE") {
        config.booker.timezone = val;
    }

    if let Ok(val) = std::env::var("ENVIRONMENT") {
        config.environment = val.parse().map_err(BookerError::Configuration)?;
    }
    if let Ok(val) = std::env::var("BOOKER_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("BOOKER_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("BOOKER_WEBDRIVER_URL") {
        config.browser.webdriver_url = val;
    }
    if let Ok(val) = std::env::var("BOOKER_DOWNLOAD_DIR") {
        config.browser.download_dir = Some(val);
    }
    if let Ok(val) = std::env::var("BOOKER_DESTINATION_DIR") {
        config.export.destination_dir = Some(val);
    }
    if let Ok(val) = std::env::var("BOOKER_WAIT_TIME_SECS") {
        if let Ok(secs) = val.parse() {
            config.export.wait_time_secs = secs;
        }
    }

    if let Ok(val) = std::env::var("SEGMENT_WRITE_KEY") {
        config.analytics.write_key = Some(secret_string(val));
        config.analytics.enabled = true;
    }

    if let Ok(val) = std::env::var("BOOKER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("BOOKER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("BOOKER_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${BOOKER_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"");
        std::env::remove_var("BOOKER_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("BOOKER_LOADER_MISSING_VAR");
        let input = "password = \"${BOOKER_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("BOOKER_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("BOOKER_LOADER_COMMENTED_VAR");
        let input = "# password = \"${BOOKER_LOADER_COMMENTED_VAR}\"\naccount = \"brand\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-booker.toml");
        assert!(matches!(result, Err(BookerError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[booker]
account = "brand"
username = "user"
password = "pass"

[export]
window_days = 7
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.booker.account, "brand");
        assert_eq!(config.export.window_days, 7);
        assert_eq!(config.booker.timezone, "America/Los_Angeles");
        assert!(config.location("ll").is_some());
        assert!(config.location("cda").is_some());
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let toml_content = r#"
[booker]
account = "brand"
username = "user"
password = "pass"

[export]
window_days = 0
"#;
        let err = load_config_str(toml_content).unwrap_err();
        assert!(err.to_string().contains("window_days"));
    }
}
