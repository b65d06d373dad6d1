//! GMusic Player - Playback Management
//!
//! Platform-agnostic playback control for a single player screen.
//!
//! This crate provides:
//! - One playback session over a fixed track catalog
//! - Load/unload of exactly one audio resource at a time
//! - Play, pause, stop (rewind), skip next/previous/to, seek
//! - Position polling with end-of-track detection
//! - Change notifications for the presentation layer
//!
//! # Architecture
//!
//! `gmusic-playback` does not touch audio hardware. Decoding and output are
//! provided by an `AudioBackend`; the bundled `SimulatedBackend` keeps a
//! virtual clock instead. `PlaybackController` is the state machine and
//! `PlayerService` runs it on a task with a cancellable polling interval.
//!
//! # Example: Driving the controller directly
//!
//! ```rust
//! use gmusic_core::{Catalog, Track};
//! use gmusic_playback::{PlaybackController, PlaybackState, PlayerConfig, SimulatedBackend};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> gmusic_playback::Result<()> {
//! let catalog = Catalog::new(vec![
//!     Track::new("1", "First", "Artist", "first.mp3"),
//!     Track::new("2", "Second", "Artist", "second.mp3"),
//! ])?;
//! let backend = SimulatedBackend::new().with_default_duration(180_000);
//!
//! let mut controller = PlaybackController::new(catalog, Arc::new(backend), PlayerConfig::default());
//! controller.mount().await?;
//! assert_eq!(controller.state(), PlaybackState::Paused);
//!
//! controller.play().await?;
//! controller.seek(90_000).await?;
//! controller.skip_to_next().await?;
//! assert_eq!(controller.current_index(), 1);
//! assert_eq!(controller.position_ms(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Running as a service
//!
//! ```rust,no_run
//! use gmusic_playback::{PlaybackController, PlayerCommand, PlayerService};
//!
//! # async fn run(controller: PlaybackController) -> gmusic_playback::Result<()> {
//! let (player, task) = PlayerService::spawn(controller)?;
//! let mut events = player.subscribe();
//!
//! player.send(PlayerCommand::Play).await?;
//! while let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//!
//! player.shutdown();
//! task.await.ok();
//! # Ok(())
//! # }
//! ```

pub mod backend;
mod config;
mod controller;
mod error;
pub mod events;
mod service;
pub mod types;

// Public exports
pub use backend::{AudioBackend, AudioResource, BackendError, ResourceStatus, SimulatedBackend};
pub use config::{BoundaryPolicy, PlayerConfig, DEFAULT_TICK_INTERVAL_MS};
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::{ErrorKind, PlaybackEvent};
pub use service::{PlayerCommand, PlayerHandle, PlayerService};
pub use types::{NowPlaying, PlaybackState, TickOutcome};
