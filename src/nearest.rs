//! Nearest-feature lookups for points that no polygon contains.
//!
//! Covers polygon layers (distance to the nearest boundary), the coastline
//! (distance to the nearest point on the line) and populated places.

use geo::MultiLineString;
use tracing::info;

use crate::models::PlacePoint;
use crate::pip::{PolygonFeature, PolygonLayer};
use crate::spatial::{PointIndex, SearchParams, SegmentHit, SegmentIndex};

/// A feature found by a nearest-boundary query
#[derive(Debug, Clone, Copy)]
pub struct FeatureHit<'a, A> {
    pub feature: &'a PolygonFeature<A>,
    /// Distance to the feature's boundary, in kilometres
    pub distance_km: f64,
}

impl<A> PolygonLayer<A> {
    /// Feature whose boundary is closest to the point.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<FeatureHit<'_, A>> {
        let hit = self.boundaries.nearest(lat, lon, self.search)?;
        self.feature_hit(hit)
    }

    /// Closest feature among those whose attributes satisfy `accept`.
    ///
    /// The search gives up after the layer's segment search limit, so a
    /// matching feature far beyond the local neighbourhood is not found.
    pub fn nearest_where<F>(&self, lat: f64, lon: f64, accept: F) -> Option<FeatureHit<'_, A>>
    where
        F: Fn(&A) -> bool,
    {
        let hit = self.boundaries.nearest_where(
            lat,
            lon,
            |owner| {
                self.get(owner)
                    .map(|f| accept(&f.attrs))
                    .unwrap_or(false)
            },
            self.search,
        )?;
        self.feature_hit(hit)
    }

    /// Closest feature satisfying `prefer` if the search finds one, otherwise
    /// the closest feature overall.
    pub fn nearest_preferring<F>(&self, lat: f64, lon: f64, prefer: F) -> Option<FeatureHit<'_, A>>
    where
        F: Fn(&A) -> bool,
    {
        self.nearest_where(lat, lon, prefer)
            .or_else(|| self.nearest(lat, lon))
    }

    fn feature_hit(&self, hit: SegmentHit) -> Option<FeatureHit<'_, A>> {
        self.get(hit.owner).map(|feature| FeatureHit {
            feature,
            distance_km: hit.distance_km,
        })
    }
}

/// The land/sea boundary as one unified multi-line
pub struct Coastline {
    segments: SegmentIndex,
    search: SearchParams,
}

impl Coastline {
    pub fn new(lines: MultiLineString<f64>, search: SearchParams) -> Self {
        let segments = SegmentIndex::build(lines.0.iter().enumerate());
        info!(
            "Coastline index built with {} lines and {} segments",
            lines.0.len(),
            segments.len()
        );
        Self { segments, search }
    }

    pub fn empty() -> Self {
        Self {
            segments: SegmentIndex::empty(),
            search: SearchParams::default(),
        }
    }

    /// Closest point on the coastline, with its distance.
    pub fn nearest_point(&self, lat: f64, lon: f64) -> Option<SegmentHit> {
        self.segments.nearest(lat, lon, self.search)
    }

    /// Distance to the coastline in kilometres.
    pub fn distance_km(&self, lat: f64, lon: f64) -> Option<f64> {
        self.nearest_point(lat, lon).map(|hit| hit.distance_km)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// A place found by a nearest-place query
#[derive(Debug, Clone, Copy)]
pub struct PlaceHit<'a> {
    pub place: &'a PlacePoint,
    pub distance_km: f64,
}

/// A set of populated places with its nearest-neighbour index
pub struct PlaceLayer {
    places: Vec<PlacePoint>,
    index: PointIndex,
}

impl PlaceLayer {
    pub fn build(places: Vec<PlacePoint>, candidates: usize) -> Self {
        let coords = places.iter().map(|p| (p.lat, p.lon)).collect();
        let index = PointIndex::build(coords, candidates);
        Self { places, index }
    }

    pub fn empty() -> Self {
        Self::build(Vec::new(), 1)
    }

    /// Closest place to the point.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<PlaceHit<'_>> {
        let neighbor = self.index.nearest(lat, lon)?;
        self.places.get(neighbor.index).map(|place| PlaceHit {
            place,
            distance_km: neighbor.distance_km,
        })
    }

    /// Up to `k` closest places, nearest first.
    pub fn nearest_k(&self, lat: f64, lon: f64, k: usize) -> Vec<PlaceHit<'_>> {
        self.index
            .nearest_k(lat, lon, k)
            .into_iter()
            .filter_map(|n| {
                self.places.get(n.index).map(|place| PlaceHit {
                    place,
                    distance_km: n.distance_km,
                })
            })
            .collect()
    }

    pub fn places(&self) -> &[PlacePoint] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
