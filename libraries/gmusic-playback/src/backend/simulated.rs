//! In-memory audio backend
//!
//! Plays nothing; keeps a virtual playback clock per resource so position
//! advances with (tokio) time while playing and stops at the duration.
//! Counts every create/unload/transport call per source, which makes it the
//! backend of choice for tests and for the terminal front-end.

use async_trait::async_trait;
use gmusic_core::{Catalog, Track};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;
use tracing::debug;

use super::{AudioBackend, AudioResource, BackendError, BackendResult, ResourceStatus};

/// Per-source call counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub created: usize,
    pub unloaded: usize,
    pub played: usize,
    pub paused: usize,
    pub stopped: usize,
    pub seeks: usize,
}

/// Backend with virtual clocks instead of audio output
///
/// Clones share the same simulation, so a test can keep one clone to
/// inspect and steer the resources the controller holds.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    inner: Arc<Mutex<Simulation>>,
}

#[derive(Debug, Default)]
struct Simulation {
    durations: HashMap<String, u64>,
    default_duration_ms: Option<u64>,
    missing: HashSet<String>,
    broken_transport: HashSet<String>,
    stats: HashMap<String, SourceStats>,
    live: HashMap<u64, Clock>,
    next_id: u64,
}

#[derive(Debug)]
struct Clock {
    source: String,
    duration_ms: u64,
    base_ms: u64,
    started_at: Option<Instant>,
}

impl Clock {
    fn position_ms(&self) -> u64 {
        let running = self
            .started_at
            .map_or(0, |t| t.elapsed().as_millis() as u64);
        (self.base_ms + running).min(self.duration_ms)
    }

    fn play(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.base_ms = self.position_ms();
        self.started_at = None;
    }

    fn stop(&mut self) {
        self.base_ms = 0;
        self.started_at = None;
    }

    fn seek(&mut self, position_ms: u64) {
        self.base_ms = position_ms.min(self.duration_ms);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }
}

impl SimulatedBackend {
    /// Empty simulation; every source is unknown until registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulation knowing every track of `catalog`
    ///
    /// Durations come from each track's hint, falling back to `default_duration_ms`.
    pub fn from_catalog(catalog: &Catalog, default_duration_ms: u64) -> Self {
        catalog
            .iter()
            .fold(Self::new(), |backend, track| {
                let duration = track.duration_hint_ms.unwrap_or(default_duration_ms);
                backend.with_source(track.source.clone(), duration)
            })
    }

    /// Register a playable source
    pub fn with_source(self, source: impl Into<String>, duration_ms: u64) -> Self {
        self.lock().durations.insert(source.into(), duration_ms);
        self
    }

    /// Duration for sources that were not registered
    pub fn with_default_duration(self, duration_ms: u64) -> Self {
        self.lock().default_duration_ms = Some(duration_ms);
        self
    }

    /// Make loading `source` fail as if the file were missing or corrupt
    pub fn with_missing_source(self, source: impl Into<String>) -> Self {
        self.lock().missing.insert(source.into());
        self
    }

    /// Make every transport command on `source` fail from now on
    pub fn break_transport(&self, source: &str) {
        self.lock().broken_transport.insert(source.to_string());
    }

    /// Move every live resource of `source` to `position_ms`
    ///
    /// Stands in for the audio clock reaching a point in the track.
    pub fn set_position(&self, source: &str, position_ms: u64) {
        let mut sim = self.lock();
        for clock in sim.live.values_mut().filter(|c| c.source == source) {
            clock.seek(position_ms);
        }
    }

    /// Call counters for `source`
    pub fn stats(&self, source: &str) -> SourceStats {
        self.lock().stats.get(source).copied().unwrap_or_default()
    }

    /// Number of resources created and not yet unloaded
    pub fn live_resources(&self) -> usize {
        self.lock().live.len()
    }

    fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn create(&self, source: &str) -> BackendResult<u64> {
        let mut sim = self.lock();

        if sim.missing.contains(source) {
            return Err(BackendError::new(format!(
                "audio source missing or corrupt: {source}"
            )));
        }
        let duration_ms = sim
            .durations
            .get(source)
            .copied()
            .or(sim.default_duration_ms)
            .ok_or_else(|| BackendError::new(format!("unknown audio source: {source}")))?;

        let id = sim.next_id;
        sim.next_id += 1;
        sim.live.insert(
            id,
            Clock {
                source: source.to_string(),
                duration_ms,
                base_ms: 0,
                started_at: None,
            },
        );
        sim.stats.entry(source.to_string()).or_default().created += 1;
        debug!("Simulated resource {} created for {}", id, source);
        Ok(id)
    }
}

#[async_trait]
impl AudioBackend for SimulatedBackend {
    async fn create_resource(&self, track: &Track) -> BackendResult<Box<dyn AudioResource>> {
        let id = self.create(&track.source)?;
        Ok(Box::new(SimulatedResource {
            id,
            source: track.source.clone(),
            backend: self.clone(),
        }))
    }
}

/// Resource handed out by `SimulatedBackend`
struct SimulatedResource {
    id: u64,
    source: String,
    backend: SimulatedBackend,
}

#[derive(Clone, Copy)]
enum Transport {
    Play,
    Pause,
    Stop,
    Seek(u64),
}

impl SimulatedResource {
    fn transport(&self, command: Transport) -> BackendResult<()> {
        let mut sim = self.backend.lock();

        if sim.broken_transport.contains(&self.source) {
            return Err(BackendError::new(format!(
                "audio device rejected command for {}",
                self.source
            )));
        }
        let Some(clock) = sim.live.get_mut(&self.id) else {
            return Err(BackendError::new("resource is not loaded"));
        };
        match command {
            Transport::Play => clock.play(),
            Transport::Pause => clock.pause(),
            Transport::Stop => clock.stop(),
            Transport::Seek(position_ms) => clock.seek(position_ms),
        }

        let stats = sim.stats.entry(self.source.clone()).or_default();
        match command {
            Transport::Play => stats.played += 1,
            Transport::Pause => stats.paused += 1,
            Transport::Stop => stats.stopped += 1,
            Transport::Seek(_) => stats.seeks += 1,
        }
        Ok(())
    }

    fn release(&self) -> BackendResult<()> {
        let mut sim = self.backend.lock();
        if sim.live.remove(&self.id).is_none() {
            return Err(BackendError::new("resource already unloaded"));
        }
        sim.stats.entry(self.source.clone()).or_default().unloaded += 1;
        debug!("Simulated resource {} unloaded", self.id);
        Ok(())
    }

    fn read_status(&self) -> ResourceStatus {
        let sim = self.backend.lock();
        sim.live
            .get(&self.id)
            .map_or_else(ResourceStatus::default, |clock| ResourceStatus {
                position_ms: clock.position_ms(),
                duration_ms: clock.duration_ms,
                is_loaded: true,
            })
    }
}

#[async_trait]
impl AudioResource for SimulatedResource {
    async fn play(&mut self) -> BackendResult<()> {
        self.transport(Transport::Play)
    }

    async fn pause(&mut self) -> BackendResult<()> {
        self.transport(Transport::Pause)
    }

    async fn stop(&mut self) -> BackendResult<()> {
        self.transport(Transport::Stop)
    }

    async fn unload(&mut self) -> BackendResult<()> {
        self.release()
    }

    async fn status(&self) -> BackendResult<ResourceStatus> {
        Ok(self.read_status())
    }

    async fn set_position(&mut self, position_ms: u64) -> BackendResult<()> {
        self.transport(Transport::Seek(position_ms))
    }
}
