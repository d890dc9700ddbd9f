//! Input event records and their enrichment output.

use serde::{Deserialize, Serialize};

/// An event location to be enriched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Opaque event identifier
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl PointRecord {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
        }
    }

    /// Coordinates are finite and within the geographic range.
    ///
    /// The enrichment engine assumes this holds; callers filter beforehand.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Geographic context resolved for one [`PointRecord`].
///
/// Every optional field is `None` when the reference data needed for it was
/// missing or yielded no match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub id: String,
    pub country: Option<String>,
    pub admin_region: Option<String>,
    pub nearest_place_name: Option<String>,
    pub nearest_place_population: Option<u64>,
    pub nearest_place_distance_km: Option<f64>,
    /// Bearing from the event towards the nearest place, degrees in `[0, 360)`
    pub bearing_deg: Option<f64>,
    pub nearest_major_place_name: Option<String>,
    pub nearest_major_place_distance_km: Option<f64>,
    pub on_land: bool,
    /// Only set for offshore events
    pub maritime_country: Option<String>,
    pub distance_to_coast_km: Option<f64>,
    pub location_text: Option<String>,
}

impl EnrichmentResult {
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_validation() {
        assert!(PointRecord::new("a", 31.5, 35.0).is_valid());
        assert!(PointRecord::new("b", -90.0, 180.0).is_valid());
        assert!(!PointRecord::new("c", 91.0, 0.0).is_valid());
        assert!(!PointRecord::new("d", 0.0, -180.5).is_valid());
        assert!(!PointRecord::new("e", f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_empty_result_has_no_fields() {
        let result = EnrichmentResult::empty("x");
        assert_eq!(result.id, "x");
        assert!(!result.on_land);
        assert!(result.country.is_none());
        assert!(result.location_text.is_none());
    }
}
