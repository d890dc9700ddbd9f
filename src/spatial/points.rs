//! Nearest-neighbour index over geographic points.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::{debug, info};

use super::sphere::{to_unit_vector, Vec3};
use crate::geodesy::haversine_km;

/// A point stored in the R-tree, pointing back into the caller's array
#[derive(Debug, Clone)]
struct IndexedPoint {
    position: Vec3,
    index: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<Vec3>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &Vec3) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Result of a nearest-point query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position in the array the index was built from
    pub index: usize,
    /// Great-circle distance in kilometres
    pub distance_km: f64,
}

/// R-tree over (lat, lon) points.
///
/// The tree only narrows the search: the best few candidates are re-measured
/// with [`haversine_km`] and the closest one wins, lowest index first on ties.
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
    coords: Vec<(f64, f64)>,
    candidates: usize,
}

impl PointIndex {
    /// Build the index from `(lat, lon)` pairs.
    ///
    /// Points with non-finite coordinates keep their slot in the backing array
    /// but are never returned.
    pub fn build(coords: Vec<(f64, f64)>, candidates: usize) -> Self {
        let indexed: Vec<IndexedPoint> = coords
            .iter()
            .enumerate()
            .filter(|(_, (lat, lon))| lat.is_finite() && lon.is_finite())
            .map(|(index, &(lat, lon))| IndexedPoint {
                position: to_unit_vector(lat, lon),
                index,
            })
            .collect();

        let skipped = coords.len() - indexed.len();
        if skipped > 0 {
            debug!("Skipped {} points with invalid coordinates", skipped);
        }

        let tree = RTree::bulk_load(indexed);
        info!("Point index built with {} entries", tree.size());

        Self {
            tree,
            coords,
            candidates: candidates.max(1),
        }
    }

    /// Closest point to `(lat, lon)`, or `None` if the index is empty.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<Neighbor> {
        self.nearest_k(lat, lon, 1).into_iter().next()
    }

    /// Up to `k` closest points, nearest first.
    pub fn nearest_k(&self, lat: f64, lon: f64, k: usize) -> Vec<Neighbor> {
        if k == 0 || !lat.is_finite() || !lon.is_finite() {
            return Vec::new();
        }

        let query = to_unit_vector(lat, lon);
        let mut found: Vec<Neighbor> = self
            .tree
            .nearest_neighbor_iter(&query)
            .take(k + self.candidates - 1)
            .map(|p| {
                let (plat, plon) = self.coords[p.index];
                Neighbor {
                    index: p.index,
                    distance_km: haversine_km(lat, lon, plat, plon),
                }
            })
            .collect();

        found.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then(a.index.cmp(&b.index))
        });
        found.truncate(k);
        found
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
