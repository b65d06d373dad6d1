//! Application configuration
use gmusic_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "GMUSIC_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Catalog used when `--catalog` is not given
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Simulated length of tracks without a duration hint
    #[serde(default = "default_track_duration_ms")]
    pub default_track_duration_ms: u64,

    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub player: PlayerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            default_track_duration_ms: default_track_duration_ms(),
            log_filter: default_log_filter(),
            player: PlayerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// The file is `explicit` if given, otherwise `GMUSIC_CONFIG_PATH` or the
    /// XDG default; a missing default file is fine, a missing explicit one is
    /// not. Variables prefixed `GMUSIC__` override file values
    /// (`GMUSIC__PLAYER__TICK_INTERVAL_MS=250`).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut settings = ::config::Config::builder();

        if let Some(path) = explicit {
            settings = settings.add_source(::config::File::from(path).required(true));
        } else if let Some(path) = resolve_config_path() {
            settings = settings.add_source(::config::File::from(path).required(false));
        }

        settings = settings.add_source(
            ::config::Environment::with_prefix("GMUSIC")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        settings.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.player.validate()?;

        if self.default_track_duration_ms == 0 {
            anyhow::bail!("default_track_duration_ms must be >= 1");
        }

        Ok(())
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Resolve the config path from `GMUSIC_CONFIG_PATH` or XDG defaults
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/gmusic/config.toml`, or `~/.config/gmusic/config.toml`
/// when `XDG_CONFIG_HOME` is not set
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|dir| dir.join("gmusic").join("config.toml"))
}

// Default values
fn default_track_duration_ms() -> u64 {
    180_000
}

fn default_log_filter() -> String {
    "gmusic=info,gmusic_playback=info".to_string()
}
