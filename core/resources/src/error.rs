use thiserror::Error;
use wde_terrain::TerrainError;

/// Errors raised while loading a resource.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to fetch '{location}': {error}")]
    Fetch {
        location: String,
        #[source]
        error: reqwest::Error,
    },

    #[error("Failed to read '{location}': {error}")]
    Io {
        location: String,
        #[source]
        error: std::io::Error,
    },

    #[error("'{location}' is not valid UTF-8.")]
    Encoding { location: String },

    #[error("Failed to decode raster: {0}")]
    Decode(String),

    #[error("Invalid elevation grid: {0}")]
    Grid(#[from] TerrainError),

    #[error("Loading of '{label}' was interrupted.")]
    Interrupted { label: String },
}

impl From<tiff::TiffError> for LoadError {
    fn from(error: tiff::TiffError) -> Self {
        LoadError::Decode(error.to_string())
    }
}
