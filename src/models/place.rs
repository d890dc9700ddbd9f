//! Populated places used for nearest-place lookups.

use serde::{Deserialize, Serialize};

/// A named populated place (city, town, village)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacePoint {
    /// Display name, transliterated where the source offers it
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub population: u64,

    /// ISO 3166-1 alpha-2 code, upper case
    pub country_code: String,

    /// Source-specific first-level admin code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_code: Option<String>,
}

impl PlacePoint {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64, population: u64, country_code: &str) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            population,
            country_code: country_code.trim().to_ascii_uppercase(),
            admin_code: None,
        }
    }

    /// Pick the ASCII name when present, otherwise the native one
    pub fn preferred_name(name: &str, ascii_name: &str) -> String {
        let ascii_name = ascii_name.trim();
        if ascii_name.is_empty() {
            name.trim().to_string()
        } else {
            ascii_name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_name() {
        assert_eq!(PlacePoint::preferred_name("Be'er Sheva", "Beersheba"), "Beersheba");
        assert_eq!(PlacePoint::preferred_name("Haifa", "  "), "Haifa");
    }

    #[test]
    fn test_country_code_is_upper_cased() {
        let place = PlacePoint::new("Eilat", 29.56, 34.95, 52_000, " il");
        assert_eq!(place.country_code, "IL");
    }
}
