//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers Booker uses in its UI: the opaque
//! site identifier behind each location impersonation link, and the numeric
//! saved-view identifiers of the report pages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Location (site) identifier newtype wrapper
///
/// Booker identifies each business site by an opaque `SpaID`, used in the
/// `Impersonate.aspx?SpaID=<id>` link on the locations page.
///
/// # Examples
///
/// ```
/// use booker_export::domain::ids::LocationId;
/// use std::str::FromStr;
///
/// let id = LocationId::from_str("36085").unwrap();
/// assert_eq!(id.as_str(), "36085");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationId(String);

impl LocationId {
    /// Creates a new LocationId from a string
    ///
    /// Returns `Err` if the identifier is empty or contains a quote, which
    /// would break the XPath used to find the impersonation link.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Location ID cannot be empty".to_string());
        }
        if id.contains('\'') || id.contains('"') {
            return Err(format!("Location ID cannot contain quotes: {id}"));
        }
        Ok(Self(id))
    }

    /// Builds a LocationId from a known-good literal
    pub(crate) fn from_static(id: &'static str) -> Self {
        Self(id.to_string())
    }

    /// Returns the location ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LocationId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocationId> for String {
    fn from(id: LocationId) -> Self {
        id.0
    }
}

impl AsRef<str> for LocationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Saved report view identifier
///
/// Views are server-side presets (filters, date type, columns) selected from
/// the "Viewing" dropdown of a search page by their numeric option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(u32);

impl ViewId {
    /// Creates a new ViewId
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ViewId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|e| format!("Invalid view ID '{s}': {e}"))
    }
}

impl From<u32> for ViewId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
