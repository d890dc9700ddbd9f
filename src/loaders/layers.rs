//! GeoJSON polygon layers and the coastline.

use ::geojson::{Feature, GeoJson};
use geo_types::{Coord, Geometry, MultiLineString, MultiPolygon};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{pick_property, pick_property_where};
use crate::config::PropertyNames;
use crate::error::{LayerError, LayerResult};
use crate::models::admin::normalize_iso_code;
use crate::models::{AdminRegion, CountryArea, MaritimeZone};
use crate::pip::PolygonFeature;
use crate::spatial::merge_line_parts;

fn read_features(path: &Path) -> LayerResult<Vec<Feature>> {
    info!("Loading {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| LayerError::io(path, e))?;
    let parsed: GeoJson = content.parse().map_err(|e| LayerError::GeoJson {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    match parsed {
        GeoJson::FeatureCollection(collection) => Ok(collection.features),
        _ => Err(LayerError::NotFeatureCollection(path.to_path_buf())),
    }
}

fn to_geo(feature: &mut Feature) -> Option<Geometry<f64>> {
    let geometry = feature.geometry.take()?;
    match Geometry::<f64>::try_from(geometry) {
        Ok(geometry) => Some(geometry),
        Err(e) => {
            debug!("Skipping unconvertible geometry: {}", e);
            None
        }
    }
}

/// Load Polygon/MultiPolygon features, deriving attributes from properties.
///
/// Other geometry types and features `attrs` rejects are skipped.
fn load_polygons<A, F>(path: &Path, layer: &str, attrs: F) -> LayerResult<Vec<PolygonFeature<A>>>
where
    F: Fn(&Map<String, Value>) -> Option<A>,
{
    let features = read_features(path)?;
    let total = features.len();
    let no_props = Map::new();

    let mut loaded = Vec::with_capacity(total);
    let mut non_polygonal = 0usize;
    let mut unnamed = 0usize;

    for mut feature in features {
        let geometry = match to_geo(&mut feature) {
            Some(Geometry::Polygon(polygon)) => MultiPolygon::new(vec![polygon]),
            Some(Geometry::MultiPolygon(multi)) => multi,
            _ => {
                non_polygonal += 1;
                continue;
            }
        };

        match attrs(feature.properties.as_ref().unwrap_or(&no_props)) {
            Some(a) => loaded.push(PolygonFeature::new(a, geometry)),
            None => unnamed += 1,
        }
    }

    if non_polygonal > 0 {
        debug!("{}: skipped {} non-polygonal features", layer, non_polygonal);
    }
    if unnamed > 0 {
        warn!("{}: skipped {} features without a usable name", layer, unnamed);
    }
    if loaded.is_empty() && non_polygonal > 0 && non_polygonal == total {
        return Err(LayerError::UnsupportedGeometry {
            path: path.to_path_buf(),
            detail: format!("none of {} features is a Polygon or MultiPolygon", total),
        });
    }

    info!("Loaded {} {} features from {}", loaded.len(), layer, path.display());
    Ok(loaded)
}

fn is_iso_code(value: &str) -> bool {
    normalize_iso_code(value).is_some()
}

/// Country (admin level 0) polygons, e.g. Natural Earth `admin_0_countries`.
pub fn load_countries(path: &Path, props: &PropertyNames) -> LayerResult<Vec<PolygonFeature<CountryArea>>> {
    load_polygons(path, "country", |p| {
        let name = pick_property(p, &props.country_name)?;
        let iso = pick_property_where(p, &props.country_iso, is_iso_code);
        Some(CountryArea::new(name, iso.as_deref()))
    })
}

/// First-level subdivisions, e.g. Natural Earth `admin_1_states_provinces`.
pub fn load_admin_regions(path: &Path, props: &PropertyNames) -> LayerResult<Vec<PolygonFeature<AdminRegion>>> {
    load_polygons(path, "admin-region", |p| {
        let name = pick_property(p, &props.admin_name)?;
        let country = pick_property(p, &props.admin_country);
        let iso = pick_property_where(p, &props.admin_iso, is_iso_code);
        Some(AdminRegion::new(name, country.as_deref(), iso.as_deref()))
    })
}

/// Exclusive economic zones or other maritime claims.
pub fn load_maritime_zones(path: &Path, props: &PropertyNames) -> LayerResult<Vec<PolygonFeature<MaritimeZone>>> {
    load_polygons(path, "maritime-zone", |p| {
        pick_property(p, &props.maritime_sovereign).map(MaritimeZone::new)
    })
}

fn explode(geometry: Geometry<f64>, parts: &mut Vec<Vec<Coord<f64>>>) {
    match geometry {
        Geometry::LineString(line) => parts.push(line.0),
        Geometry::MultiLineString(multi) => parts.extend(multi.0.into_iter().map(|l| l.0)),
        Geometry::Polygon(polygon) => {
            let (exterior, interiors) = polygon.into_inner();
            parts.push(exterior.0);
            parts.extend(interiors.into_iter().map(|l| l.0));
        }
        Geometry::MultiPolygon(multi) => {
            for polygon in multi {
                explode(Geometry::Polygon(polygon), parts);
            }
        }
        Geometry::GeometryCollection(collection) => {
            for inner in collection {
                explode(inner, parts);
            }
        }
        _ => {}
    }
}

/// Load a coastline layer as a single multi-line.
///
/// Features are exploded into their line parts and parts sharing endpoints
/// are joined, so the result holds as few lines as the data allows.
pub fn load_coastline(path: &Path) -> LayerResult<MultiLineString<f64>> {
    let features = read_features(path)?;
    let total = features.len();

    let mut parts = Vec::new();
    for mut feature in features {
        if let Some(geometry) = to_geo(&mut feature) {
            explode(geometry, &mut parts);
        }
    }

    if parts.is_empty() && total > 0 {
        return Err(LayerError::UnsupportedGeometry {
            path: path.to_path_buf(),
            detail: format!("no line geometry among {} features", total),
        });
    }

    let part_count = parts.len();
    let lines = merge_line_parts(parts);
    info!(
        "Loaded coastline from {}: {} parts merged into {} lines",
        path.display(),
        part_count,
        lines.len()
    );
    Ok(MultiLineString::new(lines))
}
