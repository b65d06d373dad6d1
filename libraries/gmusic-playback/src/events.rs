//! Playback Events
//!
//! Change notifications for the presentation layer. Events are emitted at
//! key points:
//! - State changes (idle/paused/playing)
//! - Track changes (index moved to a different catalog entry)
//! - Position updates (every tick while playing)
//! - Seeks, finished tracks and failures

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::PlaybackState;

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// Current track changed
    TrackChanged {
        /// Catalog index of the new track
        index: usize,
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Position update (every tick while playing)
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total track duration
        duration_ms: u64,
    },

    /// Position moved by a seek
    Seeked {
        /// New playback position
        position_ms: u64,
    },

    /// Track played to its end
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Non-fatal failure surfaced to the presentation layer
    Error {
        /// Failure category
        kind: ErrorKind,
        /// Error message
        message: String,
    },
}

/// Failure categories for `PlaybackEvent::Error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Audio source missing or corrupt
    ResourceLoad,
    /// Command issued on an unloaded or invalid resource
    Transport,
    /// Index past the catalog bounds
    IndexOutOfRange,
    /// Anything else
    Other,
}

/// Receiver half handed out to subscribers
pub type EventReceiver = broadcast::Receiver<PlaybackEvent>;
