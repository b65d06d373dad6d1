//! Track catalog
//!
//! The catalog is the fixed, ordered list of tracks a player screen works
//! over. Ordering is significant: it defines skip order.

use crate::error::{CoreError, Result};
use crate::types::{Track, TrackId};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Read-only, non-empty, ordered track list
///
/// Cloning is cheap; all clones share the same tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tracks: Arc<[Track]>,
}

impl Catalog {
    /// Build a catalog from an ordered list of tracks
    ///
    /// # Errors
    /// Returns `EmptyCatalog` for an empty list and `DuplicateTrackId` when
    /// two tracks share an id.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }

        {
            let mut seen = HashSet::with_capacity(tracks.len());
            for track in &tracks {
                if !seen.insert(&track.id) {
                    return Err(CoreError::DuplicateTrackId(track.id.clone()));
                }
            }
        }

        Ok(Self {
            tracks: tracks.into(),
        })
    }

    /// Parse a catalog from a JSON array of tracks
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_str(json)?;
        Self::new(tracks)
    }

    /// Load a catalog from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Number of tracks (always at least one)
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index`, if in range
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Position of the track with the given id
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// All tracks in skip order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Iterate tracks in skip order
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
