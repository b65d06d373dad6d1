/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Catalog entry referencing playable audio and its display metadata
///
/// Tracks are immutable once the catalog is built. `artwork` and `source`
/// are opaque references that only the presentation layer and the audio
/// backend know how to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Artwork reference (asset name, path or URI)
    #[serde(default)]
    pub artwork: String,

    /// Audio source reference handed to the audio backend
    #[serde(alias = "url")]
    pub source: String,

    /// Duration known ahead of loading, in milliseconds
    ///
    /// Display metadata only; the loaded resource's status always wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hint_ms: Option<u64>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            artist: artist.into(),
            artwork: String::new(),
            source: source.into(),
            duration_hint_ms: None,
        }
    }

    /// Set the artwork reference
    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = artwork.into();
        self
    }

    /// Set the duration hint
    pub fn with_duration_hint(mut self, duration: Duration) -> Self {
        self.duration_hint_ms = Some(duration.as_millis() as u64);
        self
    }

    /// Get the duration hint as a Duration
    pub fn duration_hint(&self) -> Option<Duration> {
        self.duration_hint_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_optional_metadata() {
        let track = Track::new("1", "Song", "Artist", "song.mp3")
            .with_artwork("img1.jpg")
            .with_duration_hint(Duration::from_secs(180));

        assert_eq!(track.id.as_str(), "1");
        assert_eq!(track.artwork, "img1.jpg");
        assert_eq!(track.duration_hint_ms, Some(180_000));
        assert_eq!(track.duration_hint(), Some(Duration::from_secs(180)));
    }

    #[test]
    fn deserializes_url_alias_and_missing_optionals() {
        let json = r#"{"id": "7", "title": "Song", "artist": "Artist", "url": "song.mp3"}"#;
        let track: Track = serde_json::from_str(json).unwrap();

        assert_eq!(track.source, "song.mp3");
        assert!(track.artwork.is_empty());
        assert_eq!(track.duration_hint_ms, None);
    }
}
