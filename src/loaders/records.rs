//! Input point CSV with loosely named columns.

use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{LayerError, LayerResult};
use crate::models::PointRecord;

const ID_COLUMNS: &[&str] = &["epiid", "id", "eventid", "event_id"];
const LAT_COLUMNS: &[&str] = &["latitude", "lat"];
const LON_COLUMNS: &[&str] = &["longitude", "lon", "lng", "long"];

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
    })
}

fn clean_id(raw: &str) -> String {
    raw.trim().trim_matches(|c| c == '\'' || c == '"').trim().to_string()
}

/// Load point records.
///
/// Coordinates that fail to parse are kept as NaN so the caller can report
/// and skip them. Without an id column, the 1-based row number is used.
pub fn load_records(path: &Path) -> LayerResult<Vec<PointRecord>> {
    info!("Loading records from {}", path.display());

    let file = File::open(path).map_err(|e| LayerError::io(path, e))?;
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = csv_reader.headers().map_err(|e| LayerError::csv(path, e))?.clone();
    let missing = |expected: &[&str]| LayerError::MissingColumn {
        path: path.to_path_buf(),
        expected: expected.join(", "),
    };
    let lat_idx = find_column(&headers, LAT_COLUMNS).ok_or_else(|| missing(LAT_COLUMNS))?;
    let lon_idx = find_column(&headers, LON_COLUMNS).ok_or_else(|| missing(LON_COLUMNS))?;
    let id_idx = find_column(&headers, ID_COLUMNS);
    if id_idx.is_none() {
        warn!("{}: no id column, using row numbers", path.display());
    }

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| LayerError::csv(path, e))?;
        let coord = |i: usize| {
            record
                .get(i)
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(f64::NAN)
        };

        let id = match id_idx {
            Some(i) => clean_id(record.get(i).unwrap_or("")),
            None => (row + 1).to_string(),
        };
        records.push(PointRecord::new(id, coord(lat_idx), coord(lon_idx)));
    }

    info!("Loaded {} records", records.len());
    Ok(records)
}
