//! GMusic - terminal music player
mod config;
mod repl;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crate::config::AppConfig;
use gmusic_core::Catalog;
use gmusic_playback::{PlaybackController, PlayerService, SimulatedBackend};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gmusic")]
#[command(about = "GMusic single-screen music player", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive player
    Play {
        /// Track catalog (JSON array of tracks)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print the track catalog
    List {
        /// Track catalog (JSON array of tracks)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate()?;

    // Initialize tracing; stdout belongs to the player
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Play { catalog } => {
            play(&config, catalog).await?;
        }
        Commands::List { catalog } => {
            let catalog = load_catalog(&config, catalog)?;
            println!("{}", repl::render_catalog(&catalog, None));
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

async fn play(config: &AppConfig, catalog_path: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = load_catalog(config, catalog_path)?;
    if config.player.start_index >= catalog.len() {
        anyhow::bail!(
            "player.start_index {} is past the catalog ({} tracks)",
            config.player.start_index,
            catalog.len()
        );
    }

    tracing::info!("Starting player with {} tracks", catalog.len());

    let backend = SimulatedBackend::from_catalog(&catalog, config.default_track_duration_ms);
    let controller =
        PlaybackController::new(catalog.clone(), Arc::new(backend), config.player.clone());
    let (player, task) = PlayerService::spawn(controller)?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = tokio::select! {
        result = repl::run(&player, &catalog, stdin) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
            Ok(())
        }
    };

    player.shutdown();
    task.await.context("Player task panicked")?;

    result
}

fn load_catalog(config: &AppConfig, explicit: Option<PathBuf>) -> anyhow::Result<Catalog> {
    let path = explicit
        .or_else(|| config.catalog_path.clone())
        .context("No catalog given (use --catalog or set catalog_path)")?;

    let catalog = Catalog::from_path(&path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    tracing::debug!("Loaded {} tracks from {}", catalog.len(), path.display());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_catalog_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demo/catalog.json")
    }

    #[test]
    fn demo_catalog_loads() {
        let catalog = load_catalog(&AppConfig::default(), Some(demo_catalog_path())).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0).unwrap().source, "audio/morning-drive.mp3");
        assert_eq!(catalog.get(2).unwrap().duration_hint_ms, None);
    }

    #[test]
    fn explicit_catalog_wins_over_config() {
        let config = AppConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/catalog.json")),
            ..AppConfig::default()
        };

        assert!(load_catalog(&config, Some(demo_catalog_path())).is_ok());
        assert!(load_catalog(&config, None).is_err());
        assert!(load_catalog(&AppConfig::default(), None).is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["gmusic", "play", "--catalog", "songs.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Play { catalog: Some(_) }));

        let cli = Cli::try_parse_from(["gmusic", "config", "--config", "gm.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Config));
        assert_eq!(cli.config, Some(PathBuf::from("gm.toml")));
    }
}
