//! Coarse area buckets: many admin regions of a country folded into one label
//! (e.g. several governorates reported as "North").

use hashbrown::HashMap;
use std::collections::HashMap as StdHashMap;
use tracing::info;

/// Lookup key: lower-cased, whitespace-collapsed, apostrophe variants unified
fn bucket_key(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{02BC}' | '\u{02BF}' | '`' => '\'',
            c => c,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Country -> (region -> bucket) table
#[derive(Debug, Clone, Default)]
pub struct AreaBuckets {
    by_country: HashMap<String, HashMap<String, String>>,
}

impl AreaBuckets {
    pub fn new(table: &StdHashMap<String, StdHashMap<String, String>>) -> Self {
        let by_country: HashMap<String, HashMap<String, String>> = table
            .iter()
            .map(|(country, regions)| {
                let regions = regions
                    .iter()
                    .map(|(region, bucket)| (bucket_key(region), bucket.clone()))
                    .collect();
                (bucket_key(country), regions)
            })
            .collect();

        if !by_country.is_empty() {
            info!("Loaded area buckets for {} countries", by_country.len());
        }
        Self { by_country }
    }

    /// Bucket for `region` within `country`.
    ///
    /// Unmapped regions come back unchanged; a missing or blank region stays
    /// as it is.
    pub fn aggregate_area(&self, country: Option<&str>, region: Option<&str>) -> Option<String> {
        let region = region?;
        if region.trim().is_empty() {
            return Some(region.to_string());
        }

        country
            .and_then(|c| self.by_country.get(&bucket_key(c)))
            .and_then(|regions| regions.get(&bucket_key(region)))
            .cloned()
            .or_else(|| Some(region.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.by_country.is_empty()
    }
}
