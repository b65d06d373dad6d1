/// Core error types for GMusic Player
use thiserror::Error;

use crate::types::TrackId;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for GMusic Player
#[derive(Error, Debug)]
pub enum CoreError {
    /// A catalog must contain at least one track
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Two catalog entries share the same id
    #[error("Duplicate track id in catalog: {0}")]
    DuplicateTrackId(TrackId),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
