//! Platform audio backend abstraction
//!
//! The controller never decodes, buffers or routes audio itself. A backend
//! turns a track's source reference into a resource handle, and the handle
//! exposes the transport commands and a status query. Native media bridges
//! (iOS, Android) and the in-memory simulation both sit behind these traits.

mod simulated;

pub use simulated::{SimulatedBackend, SourceStats};

use async_trait::async_trait;
use gmusic_core::Track;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a backend or one of its resources
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Create a backend error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for backend calls
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Status of a loaded resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceStatus {
    /// Current playback position
    pub position_ms: u64,
    /// Total duration (0 when unknown)
    pub duration_ms: u64,
    /// Whether the resource still holds decoded audio
    pub is_loaded: bool,
}

/// Factory for audio resources
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Acquire a resource for the track's audio source
    ///
    /// The returned resource is paused at position zero.
    ///
    /// # Errors
    /// Returns an error if the source is missing or cannot be decoded
    async fn create_resource(&self, track: &Track) -> BackendResult<Box<dyn AudioResource>>;
}

/// Handle to one loaded audio asset
///
/// The controller holds at most one of these and calls `unload` before
/// dropping it.
#[async_trait]
pub trait AudioResource: Send + Sync {
    /// Start or resume playback
    async fn play(&mut self) -> BackendResult<()>;

    /// Pause, keeping the current position
    async fn pause(&mut self) -> BackendResult<()>;

    /// Halt playback
    async fn stop(&mut self) -> BackendResult<()>;

    /// Release the decoded audio; the handle is unusable afterwards
    async fn unload(&mut self) -> BackendResult<()>;

    /// Read position, duration and load state
    async fn status(&self) -> BackendResult<ResourceStatus>;

    /// Move the playback position
    async fn set_position(&mut self, position_ms: u64) -> BackendResult<()>;
}
