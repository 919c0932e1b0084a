//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output for interactive runs
//! - JSON-formatted rolling log files (daily or hourly)
//! - Log level from configuration, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use booker_export::logging::init_logging;
//! use booker_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export flow
///
/// # Example
///
/// ```no_run
/// use booker_export::log_flow_start;
/// use booker_export::domain::LocationId;
///
/// let location = LocationId::new("36085").unwrap();
/// log_flow_start!("appointments", location);
/// ```
#[macro_export]
macro_rules! log_flow_start {
    ($flow:expr, $location:expr) => {
        tracing::info!(
            flow = $flow,
            location = %$location,
            "Starting export flow"
        );
    };
}

/// Log the completion of an export flow
///
/// # Example
///
/// ```no_run
/// use booker_export::log_flow_complete;
/// use std::time::Duration;
///
/// log_flow_complete!("orders", 3, Duration::from_secs(95));
/// ```
#[macro_export]
macro_rules! log_flow_complete {
    ($flow:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            flow = $flow,
            exports = $count,
            duration_ms = $duration.as_millis() as u64,
            "Export flow completed"
        );
    };
}

/// Log the export of one date window
#[macro_export]
macro_rules! log_window_export {
    ($entity:expr, $window:expr) => {
        tracing::info!(
            entity = %$entity,
            window = %$window,
            "Exporting window"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use booker_export::log_error_with_context;
/// use booker_export::domain::BookerError;
///
/// let error = BookerError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use booker_export::log_retry_attempt;
///
/// log_retry_attempt!(2, 10, "export link not ready");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = $reason,
            "Retrying operation"
        );
    };
}
