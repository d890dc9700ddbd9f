//! Errors raised while loading reference layers and input records.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid GeoJSON in {path}: {source}")]
    GeoJson {
        path: PathBuf,
        #[source]
        source: Box<geojson::Error>,
    },

    #[error("{0} is not a GeoJSON FeatureCollection")]
    NotFeatureCollection(PathBuf),

    #[error("Unsupported geometry in {path}: {detail}")]
    UnsupportedGeometry { path: PathBuf, detail: String },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing column in {path}: expected one of {expected}")]
    MissingColumn { path: PathBuf, expected: String },
}

impl LayerError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type LayerResult<T> = std::result::Result<T, LayerError>;
