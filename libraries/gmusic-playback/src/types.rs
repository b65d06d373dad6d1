//! Core types for playback management

use gmusic_core::{format_timestamp, progress_fraction, Track};
use serde::{Deserialize, Serialize};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No resource loaded
    #[default]
    Idle,

    /// Resource loaded, not playing
    Paused,

    /// Resource loaded and playing
    Playing,
}

impl PlaybackState {
    /// Whether a resource is held in this state
    pub fn is_loaded(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing polled
    Skipped,

    /// Position and duration refreshed
    Progressed,

    /// Track reached its end and was stopped and rewound
    Finished,

    /// Track reached its end and the next one was started
    Advanced,
}

/// Snapshot of the controller for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Catalog index of the current track
    pub index: usize,

    /// Current track metadata
    pub track: Track,

    /// Playback state
    pub state: PlaybackState,

    /// Last known position in milliseconds
    pub position_ms: u64,

    /// Last known duration in milliseconds (0 when unknown)
    pub duration_ms: u64,

    /// Slider value in `[0.0, 1.0]`
    pub progress: f64,

    /// Elapsed time label (`mm:ss`)
    pub elapsed_label: String,

    /// Total time label (`mm:ss`)
    pub total_label: String,

    /// Increments every time a resource is (re)loaded
    pub session: u64,

    /// Reason for the most recent failure, cleared by the next successful load
    pub last_error: Option<String>,
}

impl NowPlaying {
    pub(crate) fn new(
        index: usize,
        track: Track,
        state: PlaybackState,
        position_ms: u64,
        duration_ms: u64,
        session: u64,
        last_error: Option<String>,
    ) -> Self {
        Self {
            index,
            track,
            state,
            position_ms,
            duration_ms,
            progress: progress_fraction(position_ms, duration_ms),
            elapsed_label: format_timestamp(position_ms),
            total_label: format_timestamp(duration_ms),
            session,
            last_error,
        }
    }

    /// Whether audio is playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}
