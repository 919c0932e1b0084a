//! Domain models and types for booker-export.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`LocationId`], [`ViewId`])
//! - **Domain models** ([`EntityType`], [`Location`], [`ExportWindow`])
//! - **Error types** ([`BookerError`], [`BrowserError`], [`ExportError`], [`RelocateError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, BookerError>`]. Failures inside
//! an export flow are wrapped with the flow name:
//!
//! ```rust
//! use booker_export::domain::{BookerError, ExportError};
//!
//! let err = BookerError::from(ExportError::ExportNotFound("Jan 5, 2024  3:45 pm".into()))
//!     .in_flow("customers");
//! assert!(err.to_string().starts_with("customers flow failed"));
//! ```

pub mod entity;
pub mod errors;
pub mod ids;
pub mod location;
pub mod result;
pub mod window;

// Re-export commonly used types for convenience
pub use entity::EntityType;
pub use errors::{BookerError, BrowserError, ExportError, RelocateError};
pub use ids::{LocationId, ViewId};
pub use location::{default_locations, Location};
pub use result::Result;
pub use window::ExportWindow;
