//! Player configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{PlaybackError, Result};

/// Default position polling interval
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

/// What a skip does at the first/last track of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Next on the last track goes to the first, previous on the first goes to the last
    #[default]
    #[serde(alias = "wrap-around", alias = "wrap_around")]
    Wrap,

    /// Skips past either end are ignored
    #[serde(alias = "stop")]
    Clamp,
}

impl BoundaryPolicy {
    /// Index after `current`, or `None` when the policy forbids moving
    pub fn next(self, current: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self {
            Self::Wrap => Some((current + 1) % len),
            Self::Clamp => (current + 1 < len).then_some(current + 1),
        }
    }

    /// Index before `current`, or `None` when the policy forbids moving
    pub fn previous(self, current: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self {
            Self::Wrap => Some(current.checked_sub(1).unwrap_or(len - 1)),
            Self::Clamp => current.checked_sub(1),
        }
    }
}

/// Configuration for the playback controller and its ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Position polling interval while playing (default: 500)
    pub tick_interval_ms: u64,

    /// Skip behavior at catalog edges (default: wrap)
    pub boundary: BoundaryPolicy,

    /// Load and play the next track when one finishes (default: false)
    ///
    /// When off, a finished track is stopped and rewound to its start.
    pub advance_on_finish: bool,

    /// Keep playing after a skip if playback was running (default: false)
    pub resume_on_skip: bool,

    /// Track loaded on mount (default: 0)
    pub start_index: usize,

    /// Buffered events per subscriber before it starts lagging (default: 64)
    pub event_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            boundary: BoundaryPolicy::Wrap,
            advance_on_finish: false,
            resume_on_skip: false,
            start_index: 0,
            event_capacity: 64,
        }
    }
}

impl PlayerConfig {
    /// Polling interval as a Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(PlaybackError::Config(
                "tick_interval_ms must be >= 1".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(PlaybackError::Config(
                "event_capacity must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        assert_eq!(config.boundary, BoundaryPolicy::Wrap);
        assert!(!config.advance_on_finish);
        assert!(!config.resume_on_skip);
        assert_eq!(config.start_index, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn wrap_policy_wraps_both_ends() {
        assert_eq!(BoundaryPolicy::Wrap.next(0, 3), Some(1));
        assert_eq!(BoundaryPolicy::Wrap.next(2, 3), Some(0));
        assert_eq!(BoundaryPolicy::Wrap.previous(0, 3), Some(2));
        assert_eq!(BoundaryPolicy::Wrap.previous(2, 3), Some(1));
        assert_eq!(BoundaryPolicy::Wrap.next(0, 1), Some(0));
    }

    #[test]
    fn clamp_policy_stops_at_edges() {
        assert_eq!(BoundaryPolicy::Clamp.next(1, 3), Some(2));
        assert_eq!(BoundaryPolicy::Clamp.next(2, 3), None);
        assert_eq!(BoundaryPolicy::Clamp.previous(0, 3), None);
        assert_eq!(BoundaryPolicy::Clamp.previous(1, 3), Some(0));
    }

    #[test]
    fn empty_catalog_never_moves() {
        assert_eq!(BoundaryPolicy::Wrap.next(0, 0), None);
        assert_eq!(BoundaryPolicy::Clamp.previous(0, 0), None);
    }

    #[test]
    fn validate_rejects_zero_interval_and_capacity() {
        let config = PlayerConfig {
            tick_interval_ms: 0,
            ..PlayerConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlaybackError::Config(_))));

        let config = PlayerConfig {
            event_capacity: 0,
            ..PlayerConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlaybackError::Config(_))));
    }

    #[test]
    fn partial_config_uses_defaults_and_policy_aliases() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{"boundary": "wrap-around", "advance_on_finish": true}"#)
                .unwrap();
        assert_eq!(config.boundary, BoundaryPolicy::Wrap);
        assert!(config.advance_on_finish);
        assert_eq!(config.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);

        let config: PlayerConfig = serde_json::from_str(r#"{"boundary": "clamp"}"#).unwrap();
        assert_eq!(config.boundary, BoundaryPolicy::Clamp);
    }
}
