//! Human-readable location descriptions.

use crate::geodesy::{bearing_to_compass, CompassResolution};

/// Resolved fields the description is built from
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationFacts<'a> {
    pub country: Option<&'a str>,
    pub admin_region: Option<&'a str>,
    pub place_name: Option<&'a str>,
    pub place_distance_km: Option<f64>,
    pub bearing_deg: Option<f64>,
    pub on_land: bool,
    pub maritime_country: Option<&'a str>,
}

/// Compose the location text, or `None` when there is no nearest place.
///
/// On land: `"12 km SSW of Example City, North, TestLand"`.
/// Offshore: `"40 km W of North coast, TestSea EEZ"`, naming the admin region,
/// else the country, else the place itself.
pub fn compose_location_text(facts: &LocationFacts<'_>) -> Option<String> {
    let place = facts.place_name.filter(|p| !p.is_empty())?;
    let distance = facts.place_distance_km.filter(|d| d.is_finite())?;

    let km = distance.max(0.0).round() as u64;
    let lead = match facts.bearing_deg.filter(|b| b.is_finite()) {
        Some(bearing) => format!(
            "{} km {}",
            km,
            bearing_to_compass(bearing, CompassResolution::Sixteen)
        ),
        None => format!("{} km", km),
    };

    if facts.on_land {
        let mut parts = vec![format!("{} of {}", lead, place)];
        parts.extend(known(facts.admin_region).map(str::to_string));
        parts.extend(known(facts.country).map(str::to_string));
        return Some(parts.join(", "));
    }

    let anchor = known(facts.admin_region)
        .or_else(|| known(facts.country))
        .unwrap_or(place);
    let mut text = format!("{} of {} coast", lead, anchor);
    if let Some(zone) = known(facts.maritime_country) {
        text.push_str(&format!(", {} EEZ", zone));
    }
    Some(text)
}

fn known(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
