use catalog::{Location, LocationSet};
use foundation::math::{Vec3, latlon_to_sphere};

/// One pin, bound 1:1 to its location for the whole session.
///
/// `sphere_pos` is computed once from lat/lon in the sphere's local frame and
/// never changes; `|sphere_pos| == radius` holds for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub location: Location,
    pub sphere_pos: Vec3,
}

/// The immutable pin set for a session.
///
/// No pin is added or removed after construction; the set length always
/// equals the location count.
#[derive(Debug, Clone, PartialEq)]
pub struct PinSet {
    radius: f64,
    pins: Vec<Pin>,
}

impl PinSet {
    pub fn from_locations(locations: &LocationSet, radius: f64) -> Self {
        let pins = locations
            .iter()
            .map(|location| Pin {
                location: location.clone(),
                sphere_pos: latlon_to_sphere(location.latitude, location.longitude, radius),
            })
            .collect();
        Self { radius, pins }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Pin> {
        self.pins.get(index)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::PinSet;
    use catalog::{Location, LocationSet};

    fn locations() -> LocationSet {
        LocationSet::from_locations(vec![
            Location {
                id: "lon".into(),
                location_name: "London".into(),
                latitude: 51.5074,
                longitude: -0.1278,
                branch_url: "https://example.com/lon".into(),
            },
            Location {
                id: "syd".into(),
                location_name: "Sydney".into(),
                latitude: -33.8688,
                longitude: 151.2093,
                branch_url: "https://example.com/syd".into(),
            },
        ])
        .expect("valid locations")
    }

    #[test]
    fn one_pin_per_location_in_order() {
        let set = PinSet::from_locations(&locations(), 10.0);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().location.id, "lon");
        assert_eq!(set.get(1).unwrap().location.id, "syd");
    }

    #[test]
    fn pins_sit_on_the_sphere_surface() {
        let radius = 10.0;
        let set = PinSet::from_locations(&locations(), radius);
        for pin in set.iter() {
            assert!((pin.sphere_pos.length() - radius).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_catalog_gives_empty_pin_set() {
        let empty = LocationSet::from_locations(vec![]).expect("empty ok");
        let set = PinSet::from_locations(&empty, 10.0);
        assert!(set.is_empty());
    }
}
