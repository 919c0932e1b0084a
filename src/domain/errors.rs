//! Domain error types
//!
//! This module defines the error hierarchy for booker-export. Errors are
//! grouped by the layer that raises them and never expose WebDriver or HTTP
//! client types directly.

use thiserror::Error;

/// Main booker-export error type
///
/// This is the primary error type used throughout the crate. Flow-level
/// failures are wrapped in [`BookerError::Flow`] so callers can see which
/// flow failed and why.
#[derive(Debug, Error)]
pub enum BookerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Browser interaction errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Export detection and download errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// File relocation errors
    #[error("Relocation error: {0}")]
    Relocate(#[from] RelocateError),

    /// Analytics sink errors
    #[error("Analytics error: {0}")]
    Analytics(String),

    /// Invalid invocation request
    #[error("Bad request: {0}")]
    Request(String),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// The invocation deadline elapsed
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A shutdown signal stopped the invocation
    #[error("Interrupted by shutdown signal")]
    Interrupted,

    /// A failure inside a named export flow
    #[error("{flow} flow failed: {source}")]
    Flow {
        /// Name of the flow that failed (e.g. "customers")
        flow: String,
        /// Underlying failure
        source: Box<BookerError>,
    },
}

impl BookerError {
    /// Wrap this error with the name of the enclosing flow
    pub fn in_flow(self, flow: impl Into<String>) -> Self {
        BookerError::Flow {
            flow: flow.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping flow wrappers
    pub fn root(&self) -> &BookerError {
        match self {
            BookerError::Flow { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Browser interaction errors
///
/// Raised by the wait primitives and navigation helpers.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Element never appeared within the timeout
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Loading indicator did not appear or did not clear
    #[error("Loader timeout: {0}")]
    LoaderTimeout(String),

    /// Saved report view could not be selected
    #[error("Error changing view: {0}")]
    ViewChange(String),

    /// The browser session was already terminated
    #[error("Browser session terminated: {0}")]
    SessionTerminated(String),

    /// Error reported by the WebDriver server
    #[error("WebDriver error: {0}")]
    Driver(String),
}

/// Export detection and download errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export link labelled with the trigger time was never found
    #[error("Export not found: {0}")]
    ExportNotFound(String),

    /// The downloaded file did not land in the scratch directory in time
    #[error("{entity} download did not finish within {timeout_secs}s")]
    DownloadTimeout { entity: String, timeout_secs: u64 },
}

/// File relocation errors
#[derive(Debug, Error)]
pub enum RelocateError {
    /// Entity type is not one of Customer, Appointment, Order
    #[error("File type must be one of [Customer, Appointment, Order], got '{0}'")]
    InvalidFileType(String),

    /// No file in the scratch directory matches the entity type
    #[error("No file found for type {0}")]
    NoFileFound(String),

    /// More than one file in the scratch directory matches the entity type
    #[error("Multiple files found for type {entity}: {}", matches.join(", "))]
    AmbiguousFile { entity: String, matches: Vec<String> },
}

// Conversion from std::io::Error
impl From<std::io::Error> for BookerError {
    fn from(err: std::io::Error) -> Self {
        BookerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for BookerError {
    fn from(err: serde_json::Error) -> Self {
        BookerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BookerError {
    fn from(err: toml::de::Error) -> Self {
        BookerError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from WebDriver errors
impl From<thirtyfour::error::WebDriverError> for BrowserError {
    fn from(err: thirtyfour::error::WebDriverError) -> Self {
        BrowserError::Driver(err.to_string())
    }
}

impl From<thirtyfour::error::WebDriverError> for BookerError {
    fn from(err: thirtyfour::error::WebDriverError) -> Self {
        BookerError::Browser(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booker_error_display() {
        let err = BookerError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_browser_error_conversion() {
        let browser_err = BrowserError::LoaderTimeout("overlay".to_string());
        let err: BookerError = browser_err.into();
        assert!(matches!(err, BookerError::Browser(_)));
    }

    #[test]
    fn test_relocate_error_conversion() {
        let err: BookerError = RelocateError::NoFileFound("Order".to_string()).into();
        assert!(matches!(
            err,
            BookerError::Relocate(RelocateError::NoFileFound(_))
        ));
        assert_eq!(
            err.to_string(),
            "Relocation error: No file found for type Order"
        );
    }

    #[test]
    fn test_ambiguous_file_lists_matches() {
        let err = RelocateError::AmbiguousFile {
            entity: "Customer".to_string(),
            matches: vec!["Customer_a.csv".to_string(), "Customer_b.csv".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Multiple files found for type Customer: Customer_a.csv, Customer_b.csv"
        );
    }

    #[test]
    fn test_download_timeout_display() {
        let err = ExportError::DownloadTimeout {
            entity: "Order".to_string(),
            timeout_secs: 120,
        };
        assert_eq!(err.to_string(), "Order download did not finish within 120s");
    }

    #[test]
    fn test_flow_wrapping_names_flow() {
        let err = BookerError::from(ExportError::ExportNotFound("3:45 pm".to_string()))
            .in_flow("customers");
        assert_eq!(
            err.to_string(),
            "customers flow failed: Export error: Export not found: 3:45 pm"
        );
        assert!(matches!(
            err.root(),
            BookerError::Export(ExportError::ExportNotFound(_))
        ));
    }

    #[test]
    fn test_root_of_unwrapped_error_is_itself() {
        let err = BookerError::Io("disk full".to_string());
        assert!(matches!(err.root(), BookerError::Io(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: BookerError = io_err.into();
        assert!(matches!(err, BookerError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: BookerError = json_err.into();
        assert!(matches!(err, BookerError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: BookerError = toml_err.into();
        assert!(matches!(err, BookerError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &BookerError::Request("no task".to_string());
        let _: &dyn std::error::Error = &BrowserError::SessionTerminated("quit".to_string());
        let _: &dyn std::error::Error = &ExportError::ExportNotFound("x".to_string());
    }
}
