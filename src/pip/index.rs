//! Spatial index for fast polygon containment lookups.

use geo::{Intersects, Point};
use rstar::{RTree, RTreeObject, AABB};
use tracing::{debug, info};

use super::PolygonFeature;
use crate::spatial::{SearchParams, SegmentIndex};

/// R-tree entry pointing at a feature by its position in the layer
#[derive(Debug, Clone)]
struct IndexedBoundary {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBoundary {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedBoundary {
    fn new<A>(index: usize, feature: &PolygonFeature<A>) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = feature.bbox()?;
        Some(Self {
            index,
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        })
    }
}

/// An immutable polygon reference layer with its lookup structures.
///
/// Holds a bounding-box R-tree for containment and a boundary segment index
/// for nearest-feature queries (see [`crate::nearest`]). Both are built once
/// and only read afterwards.
pub struct PolygonLayer<A> {
    features: Vec<PolygonFeature<A>>,
    tree: RTree<IndexedBoundary>,
    pub(crate) boundaries: SegmentIndex,
    pub(crate) search: SearchParams,
}

impl<A> PolygonLayer<A> {
    /// Build the lookup structures for a layer.
    ///
    /// Feature order is kept: when several features contain a point, the
    /// earliest one wins.
    pub fn build(name: &str, features: Vec<PolygonFeature<A>>, search: SearchParams) -> Self {
        info!("Building {} index for {} features...", name, features.len());

        let indexed: Vec<IndexedBoundary> = features
            .iter()
            .enumerate()
            .filter_map(|(i, f)| IndexedBoundary::new(i, f))
            .collect();

        if indexed.len() < features.len() {
            debug!(
                "{}: {} features without geometry",
                name,
                features.len() - indexed.len()
            );
        }

        let tree = RTree::bulk_load(indexed);
        let boundaries = SegmentIndex::build(
            features
                .iter()
                .enumerate()
                .flat_map(|(i, f)| f.rings().map(move |ring| (i, ring))),
        );

        info!(
            "{} index built with {} polygons and {} boundary segments",
            name,
            tree.size(),
            boundaries.len()
        );

        Self {
            features,
            tree,
            boundaries,
            search,
        }
    }

    /// A layer with no features; every lookup reports no match.
    pub fn empty() -> Self {
        Self {
            features: Vec::new(),
            tree: RTree::new(),
            boundaries: SegmentIndex::empty(),
            search: SearchParams::default(),
        }
    }

    /// First feature (in layer order) whose polygon covers the point.
    ///
    /// Points on a boundary count as covered.
    pub fn containing(&self, lat: f64, lon: f64) -> Option<&PolygonFeature<A>> {
        self.containing_where(lat, lon, |_| true)
    }

    /// Like [`containing`](Self::containing), restricted to features whose
    /// attributes satisfy `accept`.
    pub fn containing_where<F>(&self, lat: f64, lon: f64, accept: F) -> Option<&PolygonFeature<A>>
    where
        F: Fn(&A) -> bool,
    {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        let point = Point::new(lon, lat);
        let query_envelope = AABB::from_point([lon, lat]);

        // R-tree iteration order is arbitrary, so pick the lowest index explicitly
        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|ib| {
                let feature = &self.features[ib.index];
                accept(&feature.attrs) && feature.geometry.intersects(&point)
            })
            .map(|ib| ib.index)
            .min()
            .map(|i| &self.features[i])
    }

    pub fn get(&self, index: usize) -> Option<&PolygonFeature<A>> {
        self.features.get(index)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square(name: &'static str, x0: f64, y0: f64, size: f64) -> PolygonFeature<&'static str> {
        let poly = polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ];
        PolygonFeature::new(name, MultiPolygon::new(vec![poly]))
    }

    fn layer() -> PolygonLayer<&'static str> {
        PolygonLayer::build(
            "test",
            vec![square("west", 0.0, 0.0, 2.0), square("east", 2.0, 0.0, 2.0)],
            SearchParams::default(),
        )
    }

    #[test]
    fn test_empty_layer() {
        let layer: PolygonLayer<()> = PolygonLayer::empty();
        assert!(layer.is_empty());
        assert!(layer.containing(1.0, 1.0).is_none());
    }

    #[test]
    fn test_interior_point() {
        let layer = layer();
        assert_eq!(layer.containing(1.0, 1.0).unwrap().attrs, "west");
        assert_eq!(layer.containing(1.0, 3.0).unwrap().attrs, "east");
    }

    #[test]
    fn test_exterior_point() {
        let layer = layer();
        assert!(layer.containing(5.0, 1.0).is_none());
        assert!(layer.containing(1.0, -0.5).is_none());
    }

    #[test]
    fn test_shared_boundary_resolves_to_first_feature() {
        let layer = layer();
        for _ in 0..3 {
            assert_eq!(layer.containing(1.0, 2.0).unwrap().attrs, "west");
        }
    }

    #[test]
    fn test_containing_where_filters_candidates() {
        let layer = layer();
        let hit = layer.containing_where(1.0, 2.0, |name| *name == "east");
        assert_eq!(hit.unwrap().attrs, "east");
        assert!(layer.containing_where(1.0, 1.0, |name| *name == "east").is_none());
    }

    #[test]
    fn test_non_finite_query() {
        assert!(layer().containing(f64::NAN, 1.0).is_none());
    }
}
