//! Unified error types for the quake map.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("feed is not a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed feature {index}: {reason}")]
    Feed { index: usize, reason: &'static str },

    #[error("metadata reports {reported} features but the feed carries {actual}")]
    CountMismatch { reported: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
