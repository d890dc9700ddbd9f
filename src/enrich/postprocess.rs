//! Presentation tweaks applied to engine output before it is written.

use hashbrown::HashMap;
use regex::{Captures, Regex};

use seisloc::area::AreaBuckets;
use seisloc::EnrichmentResult;

/// `"place, country"` from whichever parts are known.
pub fn fallback_location_text(place: Option<&str>, country: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [place, country]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Removes tokens standing as whole comma-separated components after the
/// first one. Patterns are compiled once per distinct token.
#[derive(Debug, Default)]
pub struct TokenStripper {
    patterns: HashMap<String, Regex>,
}

impl TokenStripper {
    fn pattern(&mut self, token: &str) -> Option<&Regex> {
        if !self.patterns.contains_key(token) {
            let pattern = format!(r",\s*{}\s*(,\s*|$)", regex::escape(token));
            self.patterns.insert(token.to_string(), Regex::new(&pattern).ok()?);
        }
        self.patterns.get(token)
    }

    pub fn strip(&mut self, text: &str, tokens: &[&str]) -> String {
        let mut text = text.to_string();
        for token in tokens.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if let Some(pattern) = self.pattern(token) {
                text = pattern
                    .replace_all(&text, |caps: &Captures| {
                        if caps[1].is_empty() {
                            ""
                        } else {
                            ", "
                        }
                    })
                    .into_owned();
            }
        }
        text
    }

    #[cfg(test)]
    fn compiled(&self) -> usize {
        self.patterns.len()
    }
}

/// Fold the admin region into its area bucket and settle the location text.
///
/// The region is dropped from the text since it is reported on its own. A
/// region spelled like the country is left in place.
pub fn finalize(
    mut result: EnrichmentResult,
    buckets: &AreaBuckets,
    stripper: &mut TokenStripper,
) -> EnrichmentResult {
    let region = result.admin_region.take();
    let area = buckets.aggregate_area(result.country.as_deref(), region.as_deref());

    let text = result.location_text.take().or_else(|| {
        fallback_location_text(result.nearest_place_name.as_deref(), result.country.as_deref())
    });

    let country = result.country.as_deref().unwrap_or("");
    let tokens: Vec<&str> = [region.as_deref(), area.as_deref()]
        .into_iter()
        .flatten()
        .filter(|t| !t.trim().eq_ignore_ascii_case(country.trim()))
        .collect();

    result.location_text = text.map(|t| stripper.strip(&t, &tokens));
    result.admin_region = area;
    result
}
