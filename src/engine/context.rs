//! The per-run reference context: every layer, loaded and indexed once.

use geo::MultiLineString;
use hashbrown::HashMap;
use tracing::{info, warn};

use crate::config::Policy;
use crate::models::{AdminRegion, CountryArea, MaritimeZone, PlacePoint};
use crate::nearest::{Coastline, PlaceLayer};
use crate::pip::{PolygonFeature, PolygonLayer};

/// Raw reference data handed to [`ReferenceLayers::build`].
///
/// A layer that could not be obtained is simply left empty; lookups against
/// it then yield no match.
#[derive(Debug, Default)]
pub struct LayerSources {
    pub countries: Vec<PolygonFeature<CountryArea>>,
    pub admin_regions: Vec<PolygonFeature<AdminRegion>>,
    pub maritime_zones: Vec<PolygonFeature<MaritimeZone>>,
    pub places: Vec<PlacePoint>,
    pub coastline: Option<MultiLineString<f64>>,
}

/// Immutable, indexed reference layers shared by every enrichment in a run
pub struct ReferenceLayers {
    pub countries: PolygonLayer<CountryArea>,
    pub admin_regions: PolygonLayer<AdminRegion>,
    pub maritime_zones: PolygonLayer<MaritimeZone>,
    /// Places at or above the minimum population
    pub places: PlaceLayer,
    /// Places at or above the major-place population
    pub major_places: PlaceLayer,
    pub coastline: Coastline,
    /// ISO code -> country, first occurrence in layer order
    countries_by_code: HashMap<String, CountryArea>,
}

impl ReferenceLayers {
    pub fn build(sources: LayerSources, policy: &Policy) -> Self {
        let search = policy.search_params();

        for (name, missing) in [
            ("country", sources.countries.is_empty()),
            ("admin-region", sources.admin_regions.is_empty()),
            ("maritime-zone", sources.maritime_zones.is_empty()),
            ("place", sources.places.is_empty()),
            ("coastline", sources.coastline.is_none()),
        ] {
            if missing {
                warn!("No {} reference data; dependent fields will be empty", name);
            }
        }

        let mut countries_by_code = HashMap::new();
        for feature in &sources.countries {
            if let Some(code) = &feature.attrs.iso_code {
                countries_by_code
                    .entry(code.clone())
                    .or_insert_with(|| feature.attrs.clone());
            }
        }

        let places: Vec<PlacePoint> = sources
            .places
            .into_iter()
            .filter(|p| p.population >= policy.min_place_population)
            .collect();
        let major: Vec<PlacePoint> = places
            .iter()
            .filter(|p| p.population >= policy.major_place_population)
            .cloned()
            .collect();

        info!(
            "Indexing {} places ({} major, threshold {})",
            places.len(),
            major.len(),
            policy.major_place_population
        );

        let coastline = match sources.coastline {
            Some(lines) => Coastline::new(lines, search),
            None => Coastline::empty(),
        };

        Self {
            countries: PolygonLayer::build("country", sources.countries, search),
            admin_regions: PolygonLayer::build("admin-region", sources.admin_regions, search),
            maritime_zones: PolygonLayer::build("maritime-zone", sources.maritime_zones, search),
            places: PlaceLayer::build(places, search.candidates),
            major_places: PlaceLayer::build(major, search.candidates),
            coastline,
            countries_by_code,
        }
    }

    /// Country carrying the given ISO code in the country layer.
    pub fn country_for_code(&self, code: &str) -> Option<&CountryArea> {
        self.countries_by_code.get(&code.trim().to_ascii_uppercase())
    }
}
