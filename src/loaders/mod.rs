//! Readers for the reference datasets and the input point file.

mod discover;
mod geonames;
mod layers;
mod records;

pub use self::discover::discover_layers;
pub use self::layers::{load_admin_regions, load_coastline, load_countries, load_maritime_zones};
pub use self::geonames::load_places;
pub use self::records::load_records;

use serde_json::{Map, Value};

/// Value of the first matching property, as trimmed non-empty text.
///
/// Candidates are tried in order against property names, case-insensitively.
/// If none matches exactly, the first property whose name contains a
/// candidate is used.
pub(crate) fn pick_property(props: &Map<String, Value>, candidates: &[String]) -> Option<String> {
    pick_property_where(props, candidates, |_| true)
}

/// Like [`pick_property`], but values `accept` rejects are passed over so a
/// later candidate can still match.
pub(crate) fn pick_property_where<F>(
    props: &Map<String, Value>,
    candidates: &[String],
    accept: F,
) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let usable = |value: &Value| property_text(value).filter(|text| accept(text));

    for candidate in candidates {
        let hit = props
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(candidate))
            .find_map(|(_, value)| usable(value));
        if hit.is_some() {
            return hit;
        }
    }

    candidates.iter().find_map(|candidate| {
        let needle = candidate.to_lowercase();
        props
            .iter()
            .filter(|(key, _)| key.to_lowercase().contains(&needle))
            .find_map(|(_, value)| usable(value))
    })
}

fn property_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
