//! Geographic points, bounding boxes, and region membership.
//!
//! Regions are axis-aligned rectangles with inclusive bounds; a point
//! sitting exactly on an edge is inside, matching the `>=`/`<=` semantics
//! the circuit proves. Catalogs may contain overlapping or nested regions
//! (a campus inside a city inside a state) and membership returns every
//! match in catalog order, not the most specific one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RegionError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeRange(f64),

    #[error("bounding box has min > max on the {0} axis")]
    InvertedAxis(&'static str),

    #[error("bounding box string {0:?} is not a decimal degree value")]
    ParseDegree(String),
}

/// A geographic point in IEEE double degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, RegionError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(RegionError::LatitudeRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(RegionError::LongitudeRange(lon));
        }
        Ok(Self { lat, lon })
    }
}

/// An axis-aligned rectangular geofence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> Result<Self, RegionError> {
        if min_lat > max_lat {
            return Err(RegionError::InvertedAxis("latitude"));
        }
        if min_lon > max_lon {
            return Err(RegionError::InvertedAxis("longitude"));
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Synthesize a dynamic region centered on `point`.
    ///
    /// Used by callers when no catalog entry matches a detected location;
    /// the conventional half-size is [`DYNAMIC_REGION_HALF_SIZE`].
    pub fn around(point: GeoPoint, half_size_deg: f64) -> Self {
        Self {
            min_lat: point.lat - half_size_deg,
            max_lat: point.lat + half_size_deg,
            min_lon: point.lon - half_size_deg,
            max_lon: point.lon + half_size_deg,
        }
    }

    /// Parse a geocoder bounding-box string quad `[south, north, west, east]`.
    ///
    /// This is the order Nominatim-style services return.
    pub fn from_geocoder_strings(bbox: &[String; 4]) -> Result<Self, RegionError> {
        let mut parsed = [0.0f64; 4];
        for (slot, raw) in parsed.iter_mut().zip(bbox.iter()) {
            *slot = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| RegionError::ParseDegree(raw.clone()))?;
        }
        let [south, north, west, east] = parsed;
        Self::new(south, north, west, east)
    }

    /// Inclusive containment check.
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }
}

/// Half-size in degrees of a synthesized dynamic region (~5.5 km radius).
pub const DYNAMIC_REGION_HALF_SIZE: f64 = 0.05;

/// A named catalog region.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub bounds: BoundingBox,
}

/// Read-only, ordered catalog of named regions.
#[derive(Clone, Debug, Default)]
pub struct RegionCatalog {
    regions: Vec<Region>,
}

impl RegionCatalog {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// All regions containing `point`, in catalog order.
    pub fn matching_regions(&self, point: GeoPoint) -> Vec<&Region> {
        self.regions
            .iter()
            .filter(|r| r.bounds.contains(point))
            .collect()
    }
}

/// The built-in demo catalog.
///
/// Entries are ordered largest-first so nested matches come back
/// state, city, campus.
pub fn builtin_catalog() -> RegionCatalog {
    let entries: &[(&str, &str, f64, f64, f64, f64)] = &[
        ("michigan", "Michigan", 41.696, 48.306, -90.418, -82.122),
        ("ann-arbor", "Ann Arbor, MI", 42.22, 42.32, -83.82, -83.68),
        ("umich", "University of Michigan", 42.265, 42.296, -83.755, -83.710),
        ("detroit", "Detroit, MI", 42.25, 42.45, -83.30, -82.90),
        ("chicago", "Chicago, IL", 41.65, 42.02, -87.94, -87.52),
        ("nyc", "New York City", 40.49, 40.92, -74.26, -73.70),
    ];
    RegionCatalog::new(
        entries
            .iter()
            .map(|&(id, name, min_lat, max_lat, min_lon, max_lon)| Region {
                id: id.to_string(),
                name: name.to_string(),
                bounds: BoundingBox {
                    min_lat,
                    max_lat,
                    min_lon,
                    max_lon,
                },
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campus_point_matches_nested_regions() {
        let catalog = builtin_catalog();
        let point = GeoPoint::new(42.2808, -83.7382).unwrap();
        let ids: Vec<&str> = catalog
            .matching_regions(point)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["michigan", "ann-arbor", "umich"]);
    }

    #[test]
    fn edge_of_box_counts_as_inside() {
        let bbox = BoundingBox::new(42.265, 42.296, -83.755, -83.710).unwrap();
        assert!(bbox.contains(GeoPoint::new(42.265, -83.710).unwrap()));
        assert!(bbox.contains(GeoPoint::new(42.296, -83.755).unwrap()));
        assert!(!bbox.contains(GeoPoint::new(42.2649, -83.72).unwrap()));
    }

    #[test]
    fn inverted_box_is_rejected() {
        assert_eq!(
            BoundingBox::new(42.32, 42.22, -83.82, -83.68).unwrap_err(),
            RegionError::InvertedAxis("latitude")
        );
        assert_eq!(
            BoundingBox::new(42.22, 42.32, -83.68, -83.82).unwrap_err(),
            RegionError::InvertedAxis("longitude")
        );
    }

    #[test]
    fn out_of_range_point_is_rejected() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
    }

    #[test]
    fn geocoder_quad_parses_south_north_west_east() {
        let raw = [
            "40.40".to_string(),
            "40.50".to_string(),
            "-86.95".to_string(),
            "-86.85".to_string(),
        ];
        let bbox = BoundingBox::from_geocoder_strings(&raw).unwrap();
        assert_eq!(bbox.min_lat, 40.40);
        assert_eq!(bbox.max_lat, 40.50);
        assert_eq!(bbox.min_lon, -86.95);
        assert_eq!(bbox.max_lon, -86.85);

        let catalog = RegionCatalog::new(vec![Region {
            id: "west-lafayette".to_string(),
            name: "West Lafayette, IN".to_string(),
            bounds: bbox,
        }]);
        let matches = catalog.matching_regions(GeoPoint::new(40.45, -86.90).unwrap());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "west-lafayette");
    }

    #[test]
    fn geocoder_quad_rejects_garbage() {
        let raw = [
            "40.40".to_string(),
            "north".to_string(),
            "-86.95".to_string(),
            "-86.85".to_string(),
        ];
        assert!(matches!(
            BoundingBox::from_geocoder_strings(&raw),
            Err(RegionError::ParseDegree(_))
        ));
    }

    #[test]
    fn dynamic_region_synthesis() {
        // No catalog entry covers central London; callers synthesize a box.
        let catalog = builtin_catalog();
        let point = GeoPoint::new(51.5, -0.12).unwrap();
        assert!(catalog.matching_regions(point).is_empty());

        let bbox = BoundingBox::around(point, DYNAMIC_REGION_HALF_SIZE);
        assert!((bbox.min_lat - 51.45).abs() < 1e-9);
        assert!((bbox.max_lat - 51.55).abs() < 1e-9);
        assert!((bbox.min_lon - -0.17).abs() < 1e-9);
        assert!((bbox.max_lon - -0.07).abs() < 1e-9);
        assert!(bbox.contains(point));
    }
}
