//! Attribute sets carried by the polygon reference layers.

use serde::{Deserialize, Serialize};

/// A country (admin level 0) polygon's attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryArea {
    /// Display name, e.g. "Israel"
    pub name: String,

    /// ISO 3166-1 alpha-2 code, upper case
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
}

impl CountryArea {
    pub fn new(name: impl Into<String>, iso_code: Option<&str>) -> Self {
        Self {
            name: name.into(),
            iso_code: iso_code.and_then(normalize_iso_code),
        }
    }

    /// Same country: equal ISO codes when both have one, else equal names.
    pub fn same_as(&self, other: &CountryArea) -> bool {
        match (&self.iso_code, &other.iso_code) {
            (Some(a), Some(b)) => a == b,
            _ => self.name.eq_ignore_ascii_case(&other.name),
        }
    }
}

/// A first-level subdivision (state/province/governorate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRegion {
    pub name: String,

    /// Name of the country this region belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// ISO 3166-1 alpha-2 code of the owning country
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
}

impl AdminRegion {
    pub fn new(name: impl Into<String>, country: Option<&str>, iso_code: Option<&str>) -> Self {
        Self {
            name: name.into(),
            country: country
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            iso_code: iso_code.and_then(normalize_iso_code),
        }
    }

    /// Whether this region is linked to `country`.
    ///
    /// Matches on ISO code when both sides carry one, otherwise on the
    /// country name (case-insensitive).
    pub fn belongs_to(&self, country: &CountryArea) -> bool {
        if let (Some(own), Some(other)) = (&self.iso_code, &country.iso_code) {
            return own == other;
        }
        self.country
            .as_deref()
            .map(|c| c.eq_ignore_ascii_case(&country.name))
            .unwrap_or(false)
    }
}

/// An exclusive economic zone or other claimed maritime area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaritimeZone {
    /// Sovereign or claimant country/territory
    pub sovereign: String,
}

impl MaritimeZone {
    pub fn new(sovereign: impl Into<String>) -> Self {
        Self {
            sovereign: sovereign.into(),
        }
    }
}

/// Upper-case a two-letter code; Natural Earth uses "-99" for "none".
pub fn normalize_iso_code(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_code_normalization() {
        assert_eq!(normalize_iso_code(" il "), Some("IL".to_string()));
        assert_eq!(normalize_iso_code("-99"), None);
        assert_eq!(normalize_iso_code(""), None);
        assert_eq!(normalize_iso_code("ISR"), None);
    }

    #[test]
    fn test_country_same_as() {
        let a = CountryArea::new("Israel", Some("IL"));
        assert!(a.same_as(&CountryArea::new("State of Israel", Some("il"))));
        assert!(a.same_as(&CountryArea::new("israel", None)));
        assert!(!a.same_as(&CountryArea::new("Jordan", Some("JO"))));
    }

    #[test]
    fn test_region_belongs_by_code() {
        let region = AdminRegion::new("North", Some("Wrong Name"), Some("tl"));
        assert!(region.belongs_to(&CountryArea::new("TestLand", Some("TL"))));
        assert!(!region.belongs_to(&CountryArea::new("Other", Some("OT"))));
    }

    #[test]
    fn test_region_belongs_by_name_without_codes() {
        let region = AdminRegion::new("North", Some("TestLand"), None);
        assert!(region.belongs_to(&CountryArea::new("testland", None)));
        assert!(region.belongs_to(&CountryArea::new("TestLand", Some("TL"))));
        assert!(!region.belongs_to(&CountryArea::new("Elsewhere", None)));
    }

    #[test]
    fn test_unlinked_region_belongs_nowhere() {
        let region = AdminRegion::new("Orphan", None, None);
        assert!(!region.belongs_to(&CountryArea::new("TestLand", Some("TL"))));
    }
}
