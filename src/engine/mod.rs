//! Enrichment engine: the shared reference context and per-point resolution.

mod compose;
mod context;
mod labels;
mod reconcile;

pub use compose::{compose_location_text, LocationFacts};
pub use context::{LayerSources, ReferenceLayers};
pub use labels::{AdminLabels, CountryAliases};
pub use reconcile::Enricher;
