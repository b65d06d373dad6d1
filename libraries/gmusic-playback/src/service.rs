//! Player service
//!
//! Runs a `PlaybackController` on its own task. Commands arrive over a
//! channel and are applied one at a time; while playing, the controller is
//! ticked on a fixed interval. The interval is reset whenever a command
//! starts a new session, and the whole task stops on cancellation.

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    controller::PlaybackController,
    error::{PlaybackError, Result},
    events::{EventReceiver, PlaybackEvent},
    types::NowPlaying,
};

/// Requests buffered before senders wait
const COMMAND_BUFFER: usize = 32;

/// Transport and navigation commands accepted by the service
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    Play,
    Pause,
    TogglePlayPause,
    Stop,
    Next,
    Previous,
    SkipTo(usize),
    Seek(u64),
    SeekFraction(f64),
}

enum Request {
    Command(PlayerCommand, oneshot::Sender<Result<NowPlaying>>),
    Snapshot(oneshot::Sender<NowPlaying>),
}

/// Spawns the controller task
pub struct PlayerService;

impl PlayerService {
    /// Mount `controller` on a new task and return a handle to it
    ///
    /// The initial load happens on the task; a failure there is reported as
    /// an event and leaves the player `Idle` but running.
    ///
    /// # Errors
    /// `Config` if the controller's configuration cannot drive a ticker.
    pub fn spawn(controller: PlaybackController) -> Result<(PlayerHandle, JoinHandle<()>)> {
        controller.config().validate()?;

        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let cancel = CancellationToken::new();
        let events = controller.event_sender();

        let task = tokio::spawn(run(controller, rx, cancel.clone()));

        let handle = PlayerHandle { tx, cancel, events };
        Ok((handle, task))
    }
}

/// Cloneable front door to a running player
#[derive(Clone)]
pub struct PlayerHandle {
    tx: mpsc::Sender<Request>,
    cancel: CancellationToken,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlayerHandle {
    /// Apply a command and return the resulting snapshot
    ///
    /// # Errors
    /// The command's own failure, or `ServiceClosed` if the task has ended.
    pub async fn send(&self, command: PlayerCommand) -> Result<NowPlaying> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Command(command, reply_tx))
            .await
            .map_err(|_| PlaybackError::ServiceClosed)?;
        reply_rx.await.map_err(|_| PlaybackError::ServiceClosed)?
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> Result<NowPlaying> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Snapshot(reply_tx))
            .await
            .map_err(|_| PlaybackError::ServiceClosed)?;
        reply_rx.await.map_err(|_| PlaybackError::ServiceClosed)
    }

    /// Start or resume playback
    pub async fn play(&self) -> Result<NowPlaying> {
        self.send(PlayerCommand::Play).await
    }

    /// Pause, keeping the position
    pub async fn pause(&self) -> Result<NowPlaying> {
        self.send(PlayerCommand::Pause).await
    }

    /// Skip to the next track
    pub async fn next(&self) -> Result<NowPlaying> {
        self.send(PlayerCommand::Next).await
    }

    /// Skip to the previous track
    pub async fn previous(&self) -> Result<NowPlaying> {
        self.send(PlayerCommand::Previous).await
    }

    /// Subscribe to controller events
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Ask the task to stop; the resource is released before it exits
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Token that stops the task when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the task is still accepting requests
    pub fn is_running(&self) -> bool {
        !self.tx.is_closed() && !self.cancel.is_cancelled()
    }
}

async fn run(
    mut controller: PlaybackController,
    mut rx: mpsc::Receiver<Request>,
    cancel: CancellationToken,
) {
    if let Err(e) = controller.mount().await {
        warn!("Initial track failed to load: {}", e);
    }

    let period = controller.config().tick_interval();
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.reset();

    info!("Player service started ({} tracks)", controller.catalog().len());

    loop {
        let playing = controller.is_playing();

        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                debug!("Player service cancelled");
                break;
            }

            request = rx.recv() => {
                let Some(request) = request else {
                    debug!("All player handles dropped");
                    break;
                };

                let session = controller.session();
                match request {
                    Request::Command(command, reply) => {
                        let result = apply(&mut controller, command).await;
                        if let Err(e) = &result {
                            warn!("{:?} failed: {}", command, e);
                        }
                        // Caller may have stopped waiting
                        let _ = reply.send(result.map(|()| controller.snapshot()));
                    }
                    Request::Snapshot(reply) => {
                        let _ = reply.send(controller.snapshot());
                    }
                }

                // New session, or playback just started: next poll is a full period away
                if controller.session() != session || (!playing && controller.is_playing()) {
                    ticker.reset();
                }
            }

            _ = ticker.tick(), if playing => {
                if let Err(e) = controller.tick().await {
                    warn!("Tick failed: {}", e);
                }
            }
        }
    }

    controller.shutdown().await;
    info!("Player service stopped");
}

async fn apply(controller: &mut PlaybackController, command: PlayerCommand) -> Result<()> {
    match command {
        PlayerCommand::Play => controller.play().await,
        PlayerCommand::Pause => controller.pause().await,
        PlayerCommand::TogglePlayPause => controller.toggle_play_pause().await,
        PlayerCommand::Stop => controller.stop().await,
        PlayerCommand::Next => controller.skip_to_next().await,
        PlayerCommand::Previous => controller.skip_to_previous().await,
        PlayerCommand::SkipTo(index) => controller.skip_to(index).await,
        PlayerCommand::Seek(position_ms) => controller.seek(position_ms).await,
        PlayerCommand::SeekFraction(fraction) => controller.seek_fraction(fraction).await,
    }
}
