//! Playback controller - core orchestration
//!
//! Owns the single playback session of a player screen: which catalog entry
//! is current, the one live audio resource, the playing flag and the last
//! known position. Every mutating operation takes `&mut self`, so commands
//! are strictly sequenced and a poll can never interleave with a reload.

use gmusic_core::{Catalog, Track};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    backend::{AudioBackend, AudioResource, BackendError, ResourceStatus},
    config::PlayerConfig,
    error::{PlaybackError, Result},
    events::{EventReceiver, PlaybackEvent},
    types::{NowPlaying, PlaybackState, TickOutcome},
};

/// Playback session and transport state machine
///
/// States:
/// - `Idle`: no resource (before mount, after a failure, after shutdown)
/// - `Paused`: resource loaded, not playing
/// - `Playing`: resource loaded and playing
///
/// Whenever the current index changes the old resource is unloaded before a
/// new one is created, so the loaded resource always belongs to
/// `catalog[current_index]`.
pub struct PlaybackController {
    catalog: Catalog,
    backend: Arc<dyn AudioBackend>,
    config: PlayerConfig,

    // Session
    state: PlaybackState,
    current_index: usize,
    mounted: bool,
    resource: Option<Box<dyn AudioResource>>,
    position_ms: u64,
    duration_ms: u64,
    session: u64,
    last_error: Option<String>,

    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller in the `Idle` state
    ///
    /// Nothing is loaded until `mount` (or any load/skip) is called.
    pub fn new(catalog: Catalog, backend: Arc<dyn AudioBackend>, config: PlayerConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            catalog,
            backend,
            config,
            state: PlaybackState::Idle,
            current_index: 0,
            mounted: false,
            resource: None,
            position_ms: 0,
            duration_ms: 0,
            session: 0,
            last_error: None,
            events,
        }
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<PlaybackEvent> {
        self.events.clone()
    }

    // ===== Session lifecycle =====

    /// Load the configured start track
    pub async fn mount(&mut self) -> Result<()> {
        self.load_track(self.config.start_index).await
    }

    /// Release the current resource (if any) and load `catalog[index]` paused at zero
    ///
    /// # Errors
    /// - `IndexOutOfRange` if `index` is past the catalog; nothing changes
    /// - `ResourceLoad` if the backend cannot provide the audio; the
    ///   controller is left `Idle` on the requested index
    pub async fn load_track(&mut self, index: usize) -> Result<()> {
        let Some(track) = self.catalog.get(index).cloned() else {
            return Err(self.reject(PlaybackError::IndexOutOfRange {
                index,
                len: self.catalog.len(),
            }));
        };

        let previous_track_id = self
            .mounted
            .then(|| self.current_track().id.to_string());
        let track_changed = !self.mounted || index != self.current_index;

        self.session = self.session.wrapping_add(1);
        self.release_resource().await;
        if track_changed {
            self.set_state(PlaybackState::Idle);
        }

        self.current_index = index;
        self.mounted = true;
        self.position_ms = 0;
        self.duration_ms = track.duration_hint_ms.unwrap_or(0);

        if track_changed {
            debug!("Track changed to {} ({})", index, track.id);
            self.emit(PlaybackEvent::TrackChanged {
                index,
                track_id: track.id.to_string(),
                previous_track_id,
            });
        }

        match self.acquire(&track).await {
            Ok((resource, status)) => {
                self.resource = Some(resource);
                self.duration_ms = status.duration_ms;
                self.last_error = None;
                self.set_state(PlaybackState::Paused);
                info!("Loaded track {} ({})", track.title, track.id);
                Ok(())
            }
            Err(err) => {
                warn!("Failed to load track {}: {}", track.id, err);
                Err(self.degrade(err))
            }
        }
    }

    /// Release the resource and go `Idle`
    pub async fn shutdown(&mut self) {
        self.session = self.session.wrapping_add(1);
        self.release_resource().await;
        self.set_state(PlaybackState::Idle);
        debug!("Playback controller shut down");
    }

    // ===== Transport =====

    /// Start or resume playback
    ///
    /// No-op without a loaded resource or when already playing.
    pub async fn play(&mut self) -> Result<()> {
        if self.state == PlaybackState::Playing {
            return Ok(());
        }
        let Some(resource) = self.resource.as_mut() else {
            debug!("Play ignored: no resource loaded");
            return Ok(());
        };

        let result = resource.play().await;
        if let Err(e) = result {
            return Err(self.transport_failure("play", e).await);
        }
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// Pause playback, keeping the resource and position
    ///
    /// No-op unless playing.
    pub async fn pause(&mut self) -> Result<()> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }
        let Some(resource) = self.resource.as_mut() else {
            return Ok(());
        };

        let result = resource.pause().await;
        if let Err(e) = result {
            return Err(self.transport_failure("pause", e).await);
        }
        if let Ok(status) = resource.status().await {
            self.position_ms = status.position_ms;
        }
        self.set_state(PlaybackState::Paused);
        Ok(())
    }

    /// Pause when playing, play otherwise
    pub async fn toggle_play_pause(&mut self) -> Result<()> {
        if self.is_playing() {
            self.pause().await
        } else {
            self.play().await
        }
    }

    /// Halt playback, release the resource and reload the same track at zero
    ///
    /// Unlike `pause`, the position is not kept.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(resource) = self.resource.as_mut() {
            if let Err(e) = resource.stop().await {
                warn!("Stop failed on track {}: {}", self.current_index, e);
            }
        }
        self.load_track(self.current_index).await
    }

    // ===== Navigation =====

    /// Move to the next catalog entry
    ///
    /// At the last track the configured `BoundaryPolicy` decides between
    /// wrapping to the first track and doing nothing.
    pub async fn skip_to_next(&mut self) -> Result<()> {
        match self
            .config
            .boundary
            .next(self.current_index, self.catalog.len())
        {
            Some(index) => self.skip_to(index).await,
            None => {
                debug!("Next ignored at last track");
                Ok(())
            }
        }
    }

    /// Move to the previous catalog entry
    pub async fn skip_to_previous(&mut self) -> Result<()> {
        match self
            .config
            .boundary
            .previous(self.current_index, self.catalog.len())
        {
            Some(index) => self.skip_to(index).await,
            None => {
                debug!("Previous ignored at first track");
                Ok(())
            }
        }
    }

    /// Jump to `index` (album-art carousel paging)
    pub async fn skip_to(&mut self, index: usize) -> Result<()> {
        let resume = self.config.resume_on_skip && self.is_playing();
        self.load_track(index).await?;
        if resume {
            self.play().await?;
        }
        Ok(())
    }

    // ===== Seek =====

    /// Move the loaded resource to `target_ms`, clamped to the duration
    ///
    /// Playing/paused is left as it was.
    pub async fn seek(&mut self, target_ms: u64) -> Result<()> {
        let target = if self.duration_ms > 0 {
            target_ms.min(self.duration_ms)
        } else {
            target_ms
        };
        let Some(resource) = self.resource.as_mut() else {
            return Err(self.reject(PlaybackError::NoTrackLoaded));
        };

        let result = resource.set_position(target).await;
        if let Err(e) = result {
            return Err(self.transport_failure("seek", e).await);
        }
        self.position_ms = target;
        self.emit(PlaybackEvent::Seeked {
            position_ms: target,
        });
        Ok(())
    }

    /// Seek to a fraction of the track (progress slider value)
    pub async fn seek_fraction(&mut self, fraction: f64) -> Result<()> {
        if self.resource.is_none() {
            return Err(self.reject(PlaybackError::NoTrackLoaded));
        }
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let target = (self.duration_ms as f64 * fraction).round() as u64;
        self.seek(target).await
    }

    // ===== Polling =====

    /// Refresh position and duration; handle end-of-track
    ///
    /// Only polls while playing. A position exactly equal to a known
    /// duration counts as the end: the track is stopped and rewound, or
    /// the next one is started when `advance_on_finish` is set.
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        if self.state != PlaybackState::Playing {
            return Ok(TickOutcome::Skipped);
        }
        let Some(resource) = self.resource.as_ref() else {
            return Ok(TickOutcome::Skipped);
        };

        let polled = resource.status().await;
        let status = match polled {
            Ok(status) if status.is_loaded => status,
            Ok(_) => {
                let e = BackendError::new("resource is no longer loaded");
                return Err(self.transport_failure("status", e).await);
            }
            Err(e) => return Err(self.transport_failure("status", e).await),
        };

        self.position_ms = status.position_ms;
        self.duration_ms = status.duration_ms;
        self.emit(PlaybackEvent::PositionUpdate {
            position_ms: status.position_ms,
            duration_ms: status.duration_ms,
        });

        if status.duration_ms == 0 || status.position_ms != status.duration_ms {
            return Ok(TickOutcome::Progressed);
        }

        let track_id = self.current_track().id.to_string();
        info!("Track {} finished", track_id);
        self.emit(PlaybackEvent::TrackFinished { track_id });

        if self.config.advance_on_finish {
            if let Some(next) = self
                .config
                .boundary
                .next(self.current_index, self.catalog.len())
            {
                self.load_track(next).await?;
                self.play().await?;
                return Ok(TickOutcome::Advanced);
            }
        }

        self.stop().await?;
        Ok(TickOutcome::Finished)
    }

    // ===== Queries =====

    /// Catalog this controller plays from
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Active configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether audio is playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Whether a resource is loaded
    pub fn is_loaded(&self) -> bool {
        self.resource.is_some()
    }

    /// Catalog index of the current track
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Current track metadata
    pub fn current_track(&self) -> &Track {
        &self.catalog.tracks()[self.current_index]
    }

    /// Last known position in milliseconds
    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    /// Last known duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Session counter; changes whenever a load begins or the controller shuts down
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Reason for the most recent failure
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Snapshot for the presentation layer
    pub fn snapshot(&self) -> NowPlaying {
        NowPlaying::new(
            self.current_index,
            self.current_track().clone(),
            self.state,
            self.position_ms,
            self.duration_ms,
            self.session,
            self.last_error.clone(),
        )
    }

    // ===== Internal =====

    /// Create a resource and confirm it reports itself loaded
    async fn acquire(&self, track: &Track) -> Result<(Box<dyn AudioResource>, ResourceStatus)> {
        let load_error = |reason: String| PlaybackError::ResourceLoad {
            track_id: track.id.clone(),
            reason,
        };

        let mut resource = self
            .backend
            .create_resource(track)
            .await
            .map_err(|e| load_error(e.to_string()))?;

        let polled = resource.status().await;
        let reason = match polled {
            Ok(status) if status.is_loaded => return Ok((resource, status)),
            Ok(_) => "resource reported not loaded".to_string(),
            Err(e) => e.to_string(),
        };

        if let Err(e) = resource.unload().await {
            debug!("Unload after failed load also failed: {}", e);
        }
        Err(load_error(reason))
    }

    /// Unload and drop the current resource; failures are logged only
    async fn release_resource(&mut self) {
        if let Some(mut resource) = self.resource.take() {
            if let Err(e) = resource.unload().await {
                warn!("Failed to unload resource: {}", e);
            }
        }
    }

    /// A backend command failed: drop the resource and go `Idle`
    async fn transport_failure(&mut self, op: &str, err: BackendError) -> PlaybackError {
        warn!("{} failed on track {}: {}", op, self.current_index, err);
        self.release_resource().await;
        self.degrade(PlaybackError::Transport(format!("{op}: {err}")))
    }

    /// Record a failure that leaves the controller `Idle`
    fn degrade(&mut self, err: PlaybackError) -> PlaybackError {
        self.position_ms = 0;
        self.last_error = Some(err.to_string());
        self.set_state(PlaybackState::Idle);
        self.reject(err)
    }

    /// Broadcast a failure without changing state
    fn reject(&self, err: PlaybackError) -> PlaybackError {
        self.emit(PlaybackEvent::Error {
            kind: err.kind(),
            message: err.to_string(),
        });
        err
    }

    /// Update state, notifying subscribers on change
    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        // Err only means nobody is subscribed
        let _ = self.events.send(event);
    }
}
