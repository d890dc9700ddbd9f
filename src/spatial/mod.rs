//! Spatial indices for nearest-point and nearest-boundary queries.

mod merge;
mod points;
mod segments;
pub mod sphere;

pub use merge::merge_line_parts;
pub use points::{Neighbor, PointIndex};
pub use segments::{SearchParams, SegmentHit, SegmentIndex};
