//! seisloc - reverse geographic enrichment for earthquake locations
//!
//! Resolves country, admin region, nearest places, maritime zone and coast
//! distance for event points against locally loaded reference layers, and
//! composes a short human-readable location description.

pub mod area;
pub mod config;
pub mod engine;
pub mod error;
pub mod geodesy;
pub mod loaders;
pub mod models;
pub mod nearest;
pub mod pip;
pub mod spatial;

pub use config::{EnrichConfig, Policy};
pub use engine::{Enricher, LayerSources, ReferenceLayers};
pub use error::LayerError;
pub use models::{EnrichmentResult, PointRecord};
