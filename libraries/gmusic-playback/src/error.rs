//! Error types for playback management

use gmusic_core::{CoreError, TrackId};
use thiserror::Error;

use crate::events::ErrorKind;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The audio source for a track could not be acquired
    #[error("Failed to load track {track_id}: {reason}")]
    ResourceLoad {
        /// Track whose resource failed to load
        track_id: TrackId,
        /// Backend-reported reason
        reason: String,
    },

    /// A transport command failed on the loaded resource
    #[error("Transport error: {0}")]
    Transport(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Index past the catalog bounds
    #[error("Index {index} out of range for catalog of {len} tracks")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Catalog length
        len: usize,
    },

    /// Invalid player configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The player service task is no longer running
    #[error("Player service has shut down")]
    ServiceClosed,

    /// Catalog errors
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PlaybackError {
    /// Coarse category reported to the presentation layer
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ResourceLoad { .. } => ErrorKind::ResourceLoad,
            Self::Transport(_) | Self::NoTrackLoaded => ErrorKind::Transport,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::Config(_) | Self::ServiceClosed | Self::Core(_) => ErrorKind::Other,
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
