//! Business locations
//!
//! A location is one site (tenant) inside the Booker brand account. Each
//! location has its own pre-provisioned report views for appointments and
//! orders.

use super::ids::{LocationId, ViewId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One business site and its saved report views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Opaque site identifier (`SpaID`)
    pub id: LocationId,

    /// Saved view used by the appointments report
    pub appointments_view_id: ViewId,

    /// Saved view used by the orders report
    pub orders_view_id: ViewId,
}

impl Location {
    /// Creates a new location
    pub fn new(id: LocationId, appointments_view_id: ViewId, orders_view_id: ViewId) -> Self {
        Self {
            id,
            appointments_view_id,
            orders_view_id,
        }
    }
}

/// The locations provisioned on the production brand account
///
/// Used when the configuration file does not declare any `[locations.*]`
/// tables.
pub fn default_locations() -> BTreeMap<String, Location> {
    let mut locations = BTreeMap::new();
    locations.insert(
        "ll".to_string(),
        Location::new(
            LocationId::from_static("36085"),
            ViewId::new(57651),
            ViewId::new(57650),
        ),
    );
    locations.insert(
        "cda".to_string(),
        Location::new(
            LocationId::from_static("51309"),
            ViewId::new(57707),
            ViewId::new(57738),
        ),
    );
    locations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locations() {
        let locations = default_locations();
        assert_eq!(locations.len(), 2);

        let ll = &locations["ll"];
        assert_eq!(ll.id.as_str(), "36085");
        assert_eq!(ll.appointments_view_id, ViewId::new(57651));
        assert_eq!(ll.orders_view_id, ViewId::new(57650));

        let cda = &locations["cda"];
        assert_eq!(cda.id.as_str(), "51309");
        assert_eq!(cda.orders_view_id, ViewId::new(57738));
    }

    #[test]
    fn test_location_deserialize() {
        let json = r#"{"id": "36085", "appointments_view_id": 1, "orders_view_id": 2}"#;
        let location: Location = serde_json::from_str(json).unwrap();
        assert_eq!(location.id.as_str(), "36085");
        assert_eq!(location.appointments_view_id.value(), 1);
        assert_eq!(location.orders_view_id.value(), 2);
    }

    #[test]
    fn test_location_deserialize_rejects_empty_id() {
        let json = r#"{"id": "", "appointments_view_id": 1, "orders_view_id": 2}"#;
        assert!(serde_json::from_str::<Location>(json).is_err());
    }
}
