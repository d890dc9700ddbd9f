//! Polygon features: a boundary plus an attribute set.

use geo::{BoundingRect, LineString, MultiPolygon};

/// A single reference polygon (or multipolygon) with metadata
#[derive(Debug, Clone)]
pub struct PolygonFeature<A> {
    pub attrs: A,
    pub geometry: MultiPolygon<f64>,
}

impl<A> PolygonFeature<A> {
    pub fn new(attrs: A, geometry: MultiPolygon<f64>) -> Self {
        Self { attrs, geometry }
    }

    /// Bounding box as (min_lon, min_lat, max_lon, max_lat)
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// Exterior and interior rings of every member polygon
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.geometry
            .0
            .iter()
            .flat_map(|poly| std::iter::once(poly.exterior()).chain(poly.interiors()))
    }
}
