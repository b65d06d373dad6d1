//! Interactive player: stdin commands in, status lines out
use gmusic_core::Catalog;
use gmusic_playback::{
    NowPlaying, PlaybackError, PlaybackEvent, PlaybackState, PlayerCommand, PlayerHandle,
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::error::RecvError;

pub const HELP: &str = "\
commands:
  play | pause | toggle | stop
  next | prev | goto <n>
  seek <seconds> | slide <0.0-1.0>
  status | list | help | quit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Player(PlayerCommand),
    Status,
    List,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument for `{command}`: {value}")]
    InvalidArgument { command: &'static str, value: String },
}

/// Parse a line; blank lines yield `None`
///
/// `goto` takes a 1-based track number to match what `list` prints.
pub fn parse_line(line: &str) -> Result<Option<Input>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let input = match word.to_ascii_lowercase().as_str() {
        "play" => Input::Player(PlayerCommand::Play),
        "pause" => Input::Player(PlayerCommand::Pause),
        "toggle" | "t" => Input::Player(PlayerCommand::TogglePlayPause),
        "stop" => Input::Player(PlayerCommand::Stop),
        "next" | "n" => Input::Player(PlayerCommand::Next),
        "prev" | "previous" | "p" => Input::Player(PlayerCommand::Previous),
        "goto" => {
            let number: usize = parse_arg("goto", arg)?;
            let index = number.checked_sub(1).ok_or(ParseError::InvalidArgument {
                command: "goto",
                value: number.to_string(),
            })?;
            Input::Player(PlayerCommand::SkipTo(index))
        }
        "seek" => {
            let secs: f64 = parse_arg("seek", arg)?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(ParseError::InvalidArgument {
                    command: "seek",
                    value: secs.to_string(),
                });
            }
            Input::Player(PlayerCommand::Seek((secs * 1000.0).round() as u64))
        }
        "slide" => Input::Player(PlayerCommand::SeekFraction(parse_arg("slide", arg)?)),
        "status" | "s" => Input::Status,
        "list" | "ls" => Input::List,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(input))
}

fn parse_arg<T: std::str::FromStr>(
    command: &'static str,
    arg: Option<&str>,
) -> Result<T, ParseError> {
    let value = arg.ok_or(ParseError::MissingArgument(command))?;
    value.parse().map_err(|_| ParseError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

/// `[playing] 01:23 / 03:00  Title - Artist (2/5)`
pub fn render_status(now: &NowPlaying, catalog_len: usize) -> String {
    let state = match now.state {
        PlaybackState::Idle => "idle",
        PlaybackState::Paused => "paused",
        PlaybackState::Playing => "playing",
    };
    let line = format!(
        "[{}] {} / {}  {} - {} ({}/{})",
        state,
        now.elapsed_label,
        now.total_label,
        now.track.title,
        now.track.artist,
        now.index + 1,
        catalog_len
    );
    match &now.last_error {
        Some(error) => format!("{line}  !! {error}"),
        None => line,
    }
}

/// Catalog listing, current track marked
pub fn render_catalog(catalog: &Catalog, current: Option<usize>) -> String {
    catalog
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if Some(i) == current { '>' } else { ' ' };
            format!("{} {:>2}. {} - {}", marker, i + 1, track.title, track.artist)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Event worth a line of its own; position updates are left to `status`
pub fn render_event(event: &PlaybackEvent, catalog: &Catalog) -> Option<String> {
    match event {
        PlaybackEvent::TrackChanged { index, .. } => catalog
            .get(*index)
            .map(|track| format!("now playing: {} - {}", track.title, track.artist)),
        PlaybackEvent::TrackFinished { track_id } => Some(format!("finished: {track_id}")),
        PlaybackEvent::Error { message, .. } => Some(format!("error: {message}")),
        PlaybackEvent::StateChanged { .. }
        | PlaybackEvent::PositionUpdate { .. }
        | PlaybackEvent::Seeked { .. } => None,
    }
}

/// Read commands from `input` until `quit` or end of input
pub async fn run<R>(player: &PlayerHandle, catalog: &Catalog, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut events = player.subscribe();
    let mut lines = input.lines();

    println!("{HELP}");
    println!("{}", render_status(&player.snapshot().await?, catalog.len()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(Input::Help)) => println!("{HELP}"),
                    Ok(Some(Input::List)) => {
                        let now = player.snapshot().await?;
                        println!("{}", render_catalog(catalog, Some(now.index)));
                    }
                    Ok(Some(Input::Status)) => {
                        println!("{}", render_status(&player.snapshot().await?, catalog.len()));
                    }
                    Ok(Some(Input::Player(command))) => match player.send(command).await {
                        Ok(now) => println!("{}", render_status(&now, catalog.len())),
                        Err(e @ PlaybackError::ServiceClosed) => return Err(e.into()),
                        // Already reported through the event stream
                        Err(e) => tracing::debug!("{:?} rejected: {}", command, e),
                    },
                    Err(e) => println!("{e}"),
                }
            }

            event = events.recv() => match event {
                Ok(event) => {
                    if let Some(line) = render_event(&event, catalog) {
                        println!("{line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} player events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmusic_core::Track;
    use gmusic_playback::{PlaybackController, PlayerConfig, PlayerService, SimulatedBackend};
    use std::sync::Arc;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Track::new("a", "Track A", "Artist One", "a.mp3"),
            Track::new("b", "Track B", "Artist Two", "b.mp3"),
        ])
        .unwrap()
    }

    #[test]
    fn parses_transport_and_navigation_commands() {
        assert_eq!(
            parse_line("play").unwrap(),
            Some(Input::Player(PlayerCommand::Play))
        );
        assert_eq!(
            parse_line("  TOGGLE ").unwrap(),
            Some(Input::Player(PlayerCommand::TogglePlayPause))
        );
        assert_eq!(
            parse_line("prev").unwrap(),
            Some(Input::Player(PlayerCommand::Previous))
        );
        assert_eq!(
            parse_line("goto 3").unwrap(),
            Some(Input::Player(PlayerCommand::SkipTo(2)))
        );
        assert_eq!(parse_line("q").unwrap(), Some(Input::Quit));
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn parses_seek_arguments() {
        assert_eq!(
            parse_line("seek 90").unwrap(),
            Some(Input::Player(PlayerCommand::Seek(90_000)))
        );
        assert_eq!(
            parse_line("seek 1.5").unwrap(),
            Some(Input::Player(PlayerCommand::Seek(1_500)))
        );
        assert_eq!(
            parse_line("slide 0.25").unwrap(),
            Some(Input::Player(PlayerCommand::SeekFraction(0.25)))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            parse_line("dance"),
            Err(ParseError::Unknown("dance".to_string()))
        );
        assert_eq!(
            parse_line("goto"),
            Err(ParseError::MissingArgument("goto"))
        );
        assert!(matches!(
            parse_line("goto 0"),
            Err(ParseError::InvalidArgument { command: "goto", .. })
        ));
        assert!(matches!(
            parse_line("seek -4"),
            Err(ParseError::InvalidArgument { command: "seek", .. })
        ));
        assert!(parse_line("slide half").is_err());
    }

    #[test]
    fn catalog_listing_marks_current_track() {
        let listing = render_catalog(&catalog(), Some(1));
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines[0], "   1. Track A - Artist One");
        assert_eq!(lines[1], ">  2. Track B - Artist Two");
    }

    #[test]
    fn only_notable_events_are_rendered() {
        let catalog = catalog();
        let changed = PlaybackEvent::TrackChanged {
            index: 1,
            track_id: "b".to_string(),
            previous_track_id: Some("a".to_string()),
        };
        let update = PlaybackEvent::PositionUpdate {
            position_ms: 1_000,
            duration_ms: 2_000,
        };

        assert_eq!(
            render_event(&changed, &catalog).as_deref(),
            Some("now playing: Track B - Artist Two")
        );
        assert_eq!(render_event(&update, &catalog), None);
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_session_drives_the_player() {
        let catalog = catalog();
        let backend = SimulatedBackend::from_catalog(&catalog, 60_000);
        let controller = PlaybackController::new(
            catalog.clone(),
            Arc::new(backend.clone()),
            PlayerConfig::default(),
        );
        let (player, task) = PlayerService::spawn(controller).unwrap();

        let script: &[u8] = b"play\nseek 30\nbogus\nnext\nstatus\nquit\nplay\n";
        run(&player, &catalog, script).await.unwrap();

        let now = player.snapshot().await.unwrap();
        assert_eq!(now.index, 1);
        assert_eq!(now.state, PlaybackState::Paused);
        assert_eq!(backend.stats("a.mp3").seeks, 1);
        assert_eq!(backend.stats("b.mp3").played, 0, "input after quit is ignored");

        player.shutdown();
        task.await.unwrap();
        assert_eq!(backend.live_resources(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn status_line_shows_position_and_track() {
        let catalog = catalog();
        let backend = SimulatedBackend::from_catalog(&catalog, 180_000);
        let mut controller =
            PlaybackController::new(catalog.clone(), Arc::new(backend), PlayerConfig::default());
        controller.mount().await.unwrap();
        controller.play().await.unwrap();
        controller.seek(83_000).await.unwrap();

        assert_eq!(
            render_status(&controller.snapshot(), catalog.len()),
            "[playing] 01:23 / 03:00  Track A - Artist One (1/2)"
        );
    }
}
