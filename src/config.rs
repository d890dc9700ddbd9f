use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::spatial::SearchParams;

/// Top-level configuration file. Every section is optional.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EnrichConfig {
    pub layers: LayerConfig,
    pub policy: Policy,
    pub properties: PropertyNames,
    /// Resolved country -> (region label -> replacement)
    pub admin_labels: HashMap<String, HashMap<String, String>>,
    /// Alias -> canonical country name, applied to the final country
    pub country_aliases: HashMap<String, String>,
    /// Country -> (region -> bucket), see [`crate::area::AreaBuckets`]
    pub area_buckets: HashMap<String, HashMap<String, String>>,
}

/// Where the reference layers live
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LayerConfig {
    /// Directory searched for any layer without an explicit path
    pub data_dir: Option<PathBuf>,
    pub countries: Option<PathBuf>,
    pub admin_regions: Option<PathBuf>,
    pub places: Option<PathBuf>,
    pub maritime_zones: Option<PathBuf>,
    pub coastline: Option<PathBuf>,
}

/// Thresholds and search limits used during resolution
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Policy {
    /// Places below this population are not indexed
    pub min_place_population: u64,
    /// Population at which a place counts as "major"
    pub major_place_population: u64,
    /// A nearest place closer than this may override the polygon country
    pub country_override_km: f64,
    /// Index candidates re-measured exactly per query
    pub nearest_candidates: usize,
    /// Boundary segments visited by a constrained nearest-feature search
    pub feature_search_limit: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            min_place_population: 500,
            major_place_population: 100_000,
            country_override_km: 150.0,
            nearest_candidates: 8,
            feature_search_limit: 4096,
        }
    }
}

impl Policy {
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            candidates: self.nearest_candidates.max(1),
            search_limit: self.feature_search_limit.max(1),
        }
    }
}

/// Candidate attribute names for each layer, tried in order.
///
/// Matching is case-insensitive; when no candidate matches exactly, the first
/// property whose name contains a candidate is used.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PropertyNames {
    pub country_name: Vec<String>,
    pub country_iso: Vec<String>,
    pub admin_name: Vec<String>,
    pub admin_country: Vec<String>,
    pub admin_iso: Vec<String>,
    pub maritime_sovereign: Vec<String>,
}

impl Default for PropertyNames {
    fn default() -> Self {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            country_name: names(&["NAME", "ADMIN", "SOVEREIGNT", "COUNTRY", "name_long", "name_en"]),
            country_iso: names(&["ISO_A2_EH", "ISO_A2", "iso_a2"]),
            admin_name: names(&["name", "name_en", "nameascii", "region"]),
            admin_country: names(&["admin", "geonunit", "country"]),
            admin_iso: names(&["iso_a2"]),
            maritime_sovereign: names(&["SOVEREIGN1", "TERRITORY1", "GEONAME", "COUNTRY", "SOVEREIGN"]),
        }
    }
}

impl EnrichConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: EnrichConfig = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: EnrichConfig = toml::from_str("").unwrap();
        assert_eq!(config.policy, Policy::default());
        assert!(config.layers.countries.is_none());
        assert!(config.admin_labels.is_empty());
        assert_eq!(config.properties.country_iso[0], "ISO_A2_EH");
    }

    #[test]
    fn test_partial_policy() {
        let config: EnrichConfig = toml::from_str(
            r#"
            [policy]
            country_override_km = 75.0

            [layers]
            data_dir = "data/external"
            places = "data/external/places/cities1000.txt"

            [admin_labels.Israel]
            "HaMerkaz" = "Central"

            [country_aliases]
            "Northern Cyprus" = "Cyprus"
            "#,
        )
        .unwrap();

        assert_eq!(config.policy.country_override_km, 75.0);
        assert_eq!(config.policy.major_place_population, 100_000);
        assert_eq!(
            config.layers.data_dir.as_deref(),
            Some(Path::new("data/external"))
        );
        assert_eq!(config.admin_labels["Israel"]["HaMerkaz"], "Central");
        assert_eq!(config.country_aliases["Northern Cyprus"], "Cyprus");
    }

    #[test]
    fn test_search_params_never_zero() {
        let policy = Policy {
            nearest_candidates: 0,
            feature_search_limit: 0,
            ..Policy::default()
        };
        let params = policy.search_params();
        assert_eq!(params.candidates, 1);
        assert_eq!(params.search_limit, 1);
    }

    #[test]
    fn test_example_config_parses() {
        let config: EnrichConfig = toml::from_str(include_str!("../config/enrich.example.toml")).unwrap();
        assert_eq!(config.policy, Policy::default());
        assert_eq!(config.country_aliases["N. Cyprus"], "Cyprus");
        assert_eq!(config.area_buckets["Saudi Arabia"]["Tabuk"], "Northwest");
        assert_eq!(config.admin_labels["Israel"]["Central"], "HaMerkaz");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrich.toml");
        fs::write(&path, "[policy]\nmin_place_population = 1000\n").unwrap();

        let config = EnrichConfig::load_from_file(&path).unwrap();
        assert_eq!(config.policy.min_place_population, 1000);
        assert!(EnrichConfig::load_from_file(dir.path().join("missing.toml")).is_err());
    }
}
