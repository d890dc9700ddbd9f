//! Name rewriting tables applied to resolved names.

use hashbrown::HashMap;
use std::collections::HashMap as StdHashMap;

fn key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Per-country replacements for admin-region labels.
///
/// Some datasets publish region names in a local or alternate form; the table
/// maps them onto the preferred display form for the country they belong to.
#[derive(Debug, Clone, Default)]
pub struct AdminLabels {
    by_country: HashMap<String, HashMap<String, String>>,
}

impl AdminLabels {
    pub fn new(table: &StdHashMap<String, StdHashMap<String, String>>) -> Self {
        let by_country = table
            .iter()
            .map(|(country, labels)| {
                let labels = labels
                    .iter()
                    .map(|(from, to)| (key(from), to.clone()))
                    .collect();
                (key(country), labels)
            })
            .collect();
        Self { by_country }
    }

    /// Display label for `region` within `country`.
    pub fn normalize(&self, country: Option<&str>, region: &str) -> String {
        country
            .and_then(|c| self.by_country.get(&key(c)))
            .and_then(|labels| labels.get(&key(region)))
            .cloned()
            .unwrap_or_else(|| region.to_string())
    }
}

/// Alias -> canonical country name
#[derive(Debug, Clone, Default)]
pub struct CountryAliases {
    aliases: HashMap<String, String>,
}

impl CountryAliases {
    pub fn new(table: &StdHashMap<String, String>) -> Self {
        Self {
            aliases: table
                .iter()
                .map(|(alias, canonical)| (key(alias), canonical.clone()))
                .collect(),
        }
    }

    pub fn normalize(&self, country: &str) -> String {
        self.aliases
            .get(&key(country))
            .cloned()
            .unwrap_or_else(|| country.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_labels_are_keyed_by_country() {
        let mut table = StdHashMap::new();
        table.insert(
            "Israel".to_string(),
            StdHashMap::from([("HaMerkaz".to_string(), "Central".to_string())]),
        );
        let labels = AdminLabels::new(&table);

        assert_eq!(labels.normalize(Some("israel"), " hamerkaz "), "Central");
        assert_eq!(labels.normalize(Some("Jordan"), "HaMerkaz"), "HaMerkaz");
        assert_eq!(labels.normalize(None, "HaMerkaz"), "HaMerkaz");
        assert_eq!(labels.normalize(Some("Israel"), "Haifa"), "Haifa");
    }

    #[test]
    fn test_country_aliases() {
        let aliases = CountryAliases::new(&StdHashMap::from([
            ("N. Cyprus".to_string(), "Cyprus".to_string()),
            ("Akrotiri".to_string(), "Cyprus".to_string()),
        ]));
        assert_eq!(aliases.normalize("n. cyprus"), "Cyprus");
        assert_eq!(aliases.normalize("Akrotiri"), "Cyprus");
        assert_eq!(aliases.normalize("Greece"), "Greece");
        assert_eq!(CountryAliases::default().normalize("Greece"), "Greece");
    }
}
