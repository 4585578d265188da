use foundation::math::{clamp_latitude_deg, wrap_longitude_deg};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One pinned place on the globe. Static configuration data, loaded once
/// before any pin objects are built and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub branch_url: String,
}

/// The full location list, in file order.
///
/// Ordering contract: iteration order is the order of the source JSON array.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSet {
    locations: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Parse(String),
    Invalid { id: String, reason: String },
    DuplicateId(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(msg) => write!(f, "location list is not valid JSON: {msg}"),
            CatalogError::Invalid { id, reason } => {
                write!(f, "location {id:?} is invalid: {reason}")
            }
            CatalogError::DuplicateId(id) => write!(f, "duplicate location id {id:?}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl LocationSet {
    /// Parses and normalizes a JSON array of locations.
    ///
    /// Geographic coordinates are cyclic, not domain-restricted: latitude is
    /// clamped to [-90, 90] and longitude wrapped into [-180, 180) instead of
    /// being rejected. Non-finite coordinates, empty ids, and duplicate ids
    /// are rejected.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let locations: Vec<Location> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_locations(locations)
    }

    pub fn from_locations(mut locations: Vec<Location>) -> Result<Self, CatalogError> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for loc in &mut locations {
            if loc.id.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    id: loc.id.clone(),
                    reason: "empty id".to_string(),
                });
            }
            if !loc.latitude.is_finite() || !loc.longitude.is_finite() {
                return Err(CatalogError::Invalid {
                    id: loc.id.clone(),
                    reason: "non-finite coordinates".to_string(),
                });
            }
            if !seen.insert(loc.id.clone()) {
                return Err(CatalogError::DuplicateId(loc.id.clone()));
            }
            loc.latitude = clamp_latitude_deg(loc.latitude);
            loc.longitude = wrap_longitude_deg(loc.longitude);
        }
        Ok(Self { locations })
    }

    pub fn to_json(&self) -> String {
        // Serializing a plain vec of plain fields cannot fail.
        serde_json::to_string(&self.locations).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, Location, LocationSet};
    use pretty_assertions::assert_eq;

    fn loc(id: &str, lat: f64, lon: f64) -> Location {
        Location {
            id: id.to_string(),
            location_name: format!("{id} office"),
            latitude: lat,
            longitude: lon,
            branch_url: format!("https://example.com/{id}"),
        }
    }

    #[test]
    fn parses_a_json_array_in_order() {
        let json = r#"[
            {"id":"nyc","location_name":"New York","latitude":40.7128,"longitude":-74.006,"branch_url":"https://example.com/nyc"},
            {"id":"tyo","location_name":"Tokyo","latitude":35.6762,"longitude":139.6503,"branch_url":"https://example.com/tyo"}
        ]"#;
        let set = LocationSet::from_json(json).expect("parse");
        let ids: Vec<&str> = set.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["nyc", "tyo"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn wraps_longitude_and_clamps_latitude() {
        let set = LocationSet::from_locations(vec![loc("a", 95.0, 370.0)]).expect("normalize");
        let a = set.get(0).unwrap();
        assert_eq!(a.latitude, 90.0);
        assert_eq!(a.longitude, 10.0);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = LocationSet::from_locations(vec![loc("a", 0.0, 0.0), loc("a", 1.0, 1.0)])
            .expect_err("duplicate");
        assert_eq!(err, CatalogError::DuplicateId("a".to_string()));
    }

    #[test]
    fn rejects_empty_id_and_non_finite_coordinates() {
        assert!(matches!(
            LocationSet::from_locations(vec![loc("", 0.0, 0.0)]),
            Err(CatalogError::Invalid { .. })
        ));
        assert!(matches!(
            LocationSet::from_locations(vec![loc("a", f64::NAN, 0.0)]),
            Err(CatalogError::Invalid { .. })
        ));
    }

    #[test]
    fn json_round_trip_preserves_the_set() {
        let set = LocationSet::from_locations(vec![loc("a", 10.0, 20.0), loc("b", -5.0, 30.0)])
            .expect("build");
        let back = LocationSet::from_json(&set.to_json()).expect("reparse");
        assert_eq!(back, set);
    }
}
