//! Locating reference datasets inside a data directory.

use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::LayerConfig;

const VECTOR_EXTENSIONS: &[&str] = &["geojson", "json"];
const PLACE_EXTENSIONS: &[&str] = &["txt", "gz"];

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| allowed.iter().any(|a| e.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}

/// Fill every layer path left unset from files found under `data_dir`.
///
/// Explicit paths always win. Files are visited in name order so the choice
/// is stable; the first file matching a layer's patterns is taken.
pub fn discover_layers(layers: &LayerConfig) -> LayerConfig {
    let mut resolved = layers.clone();
    let Some(dir) = &layers.data_dir else {
        return resolved;
    };
    if !dir.is_dir() {
        warn!("Data directory not found: {}", dir.display());
        return resolved;
    }

    info!("Searching {} for reference layers", dir.display());

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    let find = |patterns: &[&str], extensions: &[&str]| -> Option<PathBuf> {
        files
            .iter()
            .find(|path| {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_lowercase)
                    .unwrap_or_default();
                has_extension(path, extensions) && patterns.iter().any(|p| name.contains(p))
            })
            .cloned()
    };

    let slots: [(&str, &mut Option<PathBuf>, &[&str], &[&str]); 5] = [
        ("countries", &mut resolved.countries, &["admin_0", "countries"], VECTOR_EXTENSIONS),
        (
            "admin regions",
            &mut resolved.admin_regions,
            &["admin_1", "states_provinces"],
            VECTOR_EXTENSIONS,
        ),
        ("maritime zones", &mut resolved.maritime_zones, &["eez"], VECTOR_EXTENSIONS),
        ("coastline", &mut resolved.coastline, &["coast"], VECTOR_EXTENSIONS),
        ("places", &mut resolved.places, &["cities"], PLACE_EXTENSIONS),
    ];

    for (label, slot, patterns, extensions) in slots {
        if slot.is_some() {
            continue;
        }
        *slot = find(patterns, extensions);
        match slot {
            Some(path) => info!("Found {}: {}", label, path.display()),
            None => warn!("No {} dataset under {}", label, dir.display()),
        }
    }

    resolved
}
