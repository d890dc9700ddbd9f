//! Index of boundary segments for nearest-boundary queries.
//!
//! Each segment of a ring or line is stored as the chord between its two
//! endpoints on the unit sphere. A query walks the R-tree outwards from the
//! query point and measures the first few candidates exactly: the closest
//! point on the chord is lifted back onto the sphere and the great-circle
//! distance to it is taken.

use geo::LineString;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use super::sphere::{closest_on_segment, dot, sub, to_lat_lon, to_unit_vector, Vec3};
use crate::geodesy::haversine_km;

#[derive(Debug, Clone)]
struct IndexedSegment {
    a: Vec3,
    b: Vec3,
    owner: usize,
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<Vec3>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [
                self.a[0].min(self.b[0]),
                self.a[1].min(self.b[1]),
                self.a[2].min(self.b[2]),
            ],
            [
                self.a[0].max(self.b[0]),
                self.a[1].max(self.b[1]),
                self.a[2].max(self.b[2]),
            ],
        )
    }
}

impl PointDistance for IndexedSegment {
    fn distance_2(&self, point: &Vec3) -> f64 {
        let foot = closest_on_segment(*point, self.a, self.b);
        let d = sub(*point, foot);
        dot(d, d)
    }
}

impl IndexedSegment {
    fn measure(&self, query: Vec3, lat: f64, lon: f64) -> SegmentHit {
        let foot = closest_on_segment(query, self.a, self.b);
        // A chord through the sphere's centre has no unique surface point; use an endpoint
        let (foot_lat, foot_lon) = to_lat_lon(foot)
            .or_else(|| to_lat_lon(self.a))
            .unwrap_or((lat, lon));

        SegmentHit {
            owner: self.owner,
            distance_km: haversine_km(lat, lon, foot_lat, foot_lon),
            lat: foot_lat,
            lon: foot_lon,
        }
    }
}

/// Nearest boundary point found by a [`SegmentIndex`] query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Owner id supplied when the segment was indexed
    pub owner: usize,
    /// Great-circle distance from the query point, in kilometres
    pub distance_km: f64,
    /// Latitude of the closest boundary point
    pub lat: f64,
    /// Longitude of the closest boundary point
    pub lon: f64,
}

impl SegmentHit {
    fn closer_than(&self, other: &SegmentHit) -> bool {
        self.distance_km < other.distance_km
            || (self.distance_km == other.distance_km && self.owner < other.owner)
    }
}

/// How hard a nearest-boundary query searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Accepted segments measured exactly before the search stops
    pub candidates: usize,
    /// Upper bound on segments visited, accepted or not
    pub search_limit: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            candidates: 8,
            search_limit: 4096,
        }
    }
}

/// R-tree of line segments tagged with an owner id
pub struct SegmentIndex {
    tree: RTree<IndexedSegment>,
}

impl SegmentIndex {
    /// Index every segment of the given lines.
    ///
    /// Coordinates are `x = lon`, `y = lat`. Zero-length and non-finite
    /// segments are dropped.
    pub fn build<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (usize, &'a LineString<f64>)>,
    {
        let mut segments = Vec::new();

        for (owner, line) in lines {
            for seg in line.lines() {
                let (s, e) = (seg.start, seg.end);
                if !(s.x.is_finite() && s.y.is_finite() && e.x.is_finite() && e.y.is_finite()) {
                    continue;
                }
                if s == e {
                    continue;
                }
                segments.push(IndexedSegment {
                    a: to_unit_vector(s.y, s.x),
                    b: to_unit_vector(e.y, e.x),
                    owner,
                });
            }
        }

        Self {
            tree: RTree::bulk_load(segments),
        }
    }

    pub fn empty() -> Self {
        Self { tree: RTree::new() }
    }

    /// Nearest boundary point over all owners.
    pub fn nearest(&self, lat: f64, lon: f64, params: SearchParams) -> Option<SegmentHit> {
        self.nearest_where(lat, lon, |_| true, params)
    }

    /// Nearest boundary point among owners accepted by `accept`.
    ///
    /// Returns `None` when no accepted segment is met within
    /// `params.search_limit` visited segments.
    pub fn nearest_where<F>(
        &self,
        lat: f64,
        lon: f64,
        accept: F,
        params: SearchParams,
    ) -> Option<SegmentHit>
    where
        F: Fn(usize) -> bool,
    {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        let query = to_unit_vector(lat, lon);
        let mut best: Option<SegmentHit> = None;
        let mut measured = 0;

        for seg in self
            .tree
            .nearest_neighbor_iter(&query)
            .take(params.search_limit.max(1))
        {
            if !accept(seg.owner) {
                continue;
            }

            let hit = seg.measure(query, lat, lon);
            best = match best {
                Some(current) if !hit.closer_than(&current) => Some(current),
                _ => Some(hit),
            };

            measured += 1;
            if measured >= params.candidates.max(1) {
                break;
            }
        }

        best
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
