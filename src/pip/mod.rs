//! Point-in-Polygon (PIP) containment lookups.
//!
//! Reference polygon layers are indexed with an R-tree over their bounding
//! boxes; candidates are confirmed with an exact planar test on lon/lat.

mod boundary;
mod index;

pub use boundary::PolygonFeature;
pub use index::PolygonLayer;
