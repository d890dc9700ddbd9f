//! Per-point resolution: containment, nearest features, and reconciliation
//! of the competing country signals.

use rayon::prelude::*;
use tracing::{debug, info};

use super::compose::{compose_location_text, LocationFacts};
use super::context::ReferenceLayers;
use super::labels::{AdminLabels, CountryAliases};
use crate::config::Policy;
use crate::geodesy::initial_bearing_deg;
use crate::models::{AdminRegion, CountryArea, EnrichmentResult, PointRecord};
use crate::nearest::PlaceHit;

/// Enriches point records against a shared [`ReferenceLayers`] context.
///
/// Resolution never fails: anything that cannot be determined is left `None`.
pub struct Enricher<'a> {
    layers: &'a ReferenceLayers,
    policy: Policy,
    admin_labels: AdminLabels,
    country_aliases: CountryAliases,
}

impl<'a> Enricher<'a> {
    pub fn new(layers: &'a ReferenceLayers, policy: Policy) -> Self {
        Self {
            layers,
            policy,
            admin_labels: AdminLabels::default(),
            country_aliases: CountryAliases::default(),
        }
    }

    pub fn with_admin_labels(mut self, labels: AdminLabels) -> Self {
        self.admin_labels = labels;
        self
    }

    pub fn with_country_aliases(mut self, aliases: CountryAliases) -> Self {
        self.country_aliases = aliases;
        self
    }

    /// Enrich a batch in parallel; output order matches input order.
    pub fn enrich_batch(&self, records: &[PointRecord]) -> Vec<EnrichmentResult> {
        info!("Enriching {} records", records.len());
        records.par_iter().map(|r| self.enrich(r)).collect()
    }

    /// Resolve the geographic context of a single record.
    pub fn enrich(&self, record: &PointRecord) -> EnrichmentResult {
        let (lat, lon) = (record.lat, record.lon);
        let layers = self.layers;

        // Containment decides on-land; otherwise the nearest country is a best guess
        let contained = layers.countries.containing(lat, lon);
        let on_land = contained.is_some();
        let mut country: Option<CountryArea> = match contained {
            Some(feature) => Some(feature.attrs.clone()),
            None => layers
                .countries
                .nearest(lat, lon)
                .map(|hit| hit.feature.attrs.clone()),
        };

        let mut region: Option<&AdminRegion> = layers
            .admin_regions
            .containing(lat, lon)
            .map(|f| &f.attrs)
            .or_else(|| {
                layers
                    .admin_regions
                    .nearest(lat, lon)
                    .map(|hit| &hit.feature.attrs)
            });
        let mut label_country = country.as_ref().map(|c| c.name.clone());

        let place = layers.places.nearest(lat, lon);
        let major = layers.major_places.nearest(lat, lon);

        let overridden = place
            .as_ref()
            .map(|hit| self.reconcile_country(&mut country, hit))
            .unwrap_or(false);

        // A region found in the first pass is kept; labels stay keyed by its country
        if overridden && region.is_none() {
            if let Some(final_country) = &country {
                region = self.region_within(lat, lon, final_country);
                if region.is_some() {
                    label_country = Some(final_country.name.clone());
                }
            }
        }

        let admin_region = region.map(|r| {
            self.admin_labels
                .normalize(label_country.as_deref(), &r.name)
        });

        let (maritime_country, distance_to_coast_km) = if on_land {
            (None, None)
        } else {
            let zone = layers
                .maritime_zones
                .containing(lat, lon)
                .or_else(|| layers.maritime_zones.nearest(lat, lon).map(|hit| hit.feature))
                .map(|f| f.attrs.sovereign.clone());
            (zone, layers.coastline.distance_km(lat, lon))
        };

        let country = country.map(|c| self.country_aliases.normalize(&c.name));
        let bearing_deg =
            place.map(|hit| initial_bearing_deg(lat, lon, hit.place.lat, hit.place.lon));

        let location_text = compose_location_text(&LocationFacts {
            country: country.as_deref(),
            admin_region: admin_region.as_deref(),
            place_name: place.map(|hit| hit.place.name.as_str()),
            place_distance_km: place.map(|hit| hit.distance_km),
            bearing_deg,
            on_land,
            maritime_country: maritime_country.as_deref(),
        });

        debug!(
            "{} ({}, {}): country={:?} region={:?} on_land={}",
            record.id, lat, lon, country, admin_region, on_land
        );

        EnrichmentResult {
            id: record.id.clone(),
            country,
            admin_region,
            nearest_place_name: place.map(|hit| hit.place.name.clone()),
            nearest_place_population: place.map(|hit| hit.place.population),
            nearest_place_distance_km: place.map(|hit| hit.distance_km),
            bearing_deg,
            nearest_major_place_name: major.map(|hit| hit.place.name.clone()),
            nearest_major_place_distance_km: major.map(|hit| hit.distance_km),
            on_land,
            maritime_country,
            distance_to_coast_km,
            location_text,
        }
    }

    /// Let a close enough nearest place overrule the polygon country.
    ///
    /// Returns whether `country` was replaced.
    fn reconcile_country(&self, country: &mut Option<CountryArea>, place: &PlaceHit<'_>) -> bool {
        if place.distance_km > self.policy.country_override_km {
            return false;
        }

        // A code absent from the country layer has no display name to switch to
        let Some(place_country) = self.layers.country_for_code(&place.place.country_code) else {
            return false;
        };

        if country
            .as_ref()
            .map(|c| c.same_as(place_country))
            .unwrap_or(false)
        {
            return false;
        }

        debug!(
            "Country {:?} overridden by {} ({:.1} km to {})",
            country.as_ref().map(|c| &c.name),
            place_country.name,
            place.distance_km,
            place.place.name
        );
        *country = Some(place_country.clone());
        true
    }

    /// Admin region of `country` at the point: containment first, then the
    /// nearest region of that country, then the nearest region overall.
    fn region_within(&self, lat: f64, lon: f64, country: &CountryArea) -> Option<&'a AdminRegion> {
        let layers: &'a ReferenceLayers = self.layers;
        layers
            .admin_regions
            .containing_where(lat, lon, |r| r.belongs_to(country))
            .map(|f| &f.attrs)
            .or_else(|| {
                layers
                    .admin_regions
                    .nearest_preferring(lat, lon, |r| r.belongs_to(country))
                    .map(|hit| &hit.feature.attrs)
            })
    }
}
