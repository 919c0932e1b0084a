//! Exported entity types
//!
//! Booker names its export files after the entity being exported, and the
//! destination tree uses the same names, so a single enum drives both the
//! download match and the destination path.

use crate::domain::errors::RelocateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of data carried by an export file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// Customer list export
    Customer,
    /// Appointment report export
    Appointment,
    /// Order report export
    Order,
}

impl EntityType {
    /// All recognised entity types
    pub const ALL: [EntityType; 3] = [
        EntityType::Customer,
        EntityType::Appointment,
        EntityType::Order,
    ];

    /// Name used in download file names and destination paths
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Customer => "Customer",
            EntityType::Appointment => "Appointment",
            EntityType::Order => "Order",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = RelocateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|entity| entity.as_str() == s)
            .ok_or_else(|| RelocateError::InvalidFileType(s.to_string()))
    }
}
