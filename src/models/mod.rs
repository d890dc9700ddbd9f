//! Core data models for the enrichment engine.

pub mod admin;
pub mod place;
pub mod record;

pub use admin::{AdminRegion, CountryArea, MaritimeZone};
pub use place::PlacePoint;
pub use record::{EnrichmentResult, PointRecord};
