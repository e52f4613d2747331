//! Runtime configuration, read from the environment (and `.env` via dotenv).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::player::{MusicError, MusicResult};

/// How long a controller waits for a new track before leaving voice.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);
/// Distinct non-requester votes needed to skip a track.
pub const DEFAULT_SKIP_QUORUM: usize = 3;
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Knobs handed to every playback controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    pub idle_timeout: Duration,
    pub skip_quorum: usize,
    pub default_volume: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            skip_quorum: DEFAULT_SKIP_QUORUM,
            default_volume: DEFAULT_VOLUME,
        }
    }
}

impl PlayerConfig {
    /// Build the player configuration from `MUSIC_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> MusicResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MusicResult<Self> {
        let defaults = Self::default();

        let idle_timeout = parse_var::<u64>(&lookup, "MUSIC_IDLE_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.idle_timeout);

        let skip_quorum =
            parse_var::<usize>(&lookup, "MUSIC_SKIP_QUORUM")?.unwrap_or(defaults.skip_quorum);
        if skip_quorum == 0 {
            return Err(MusicError::ConfigError(
                "MUSIC_SKIP_QUORUM must be at least 1".to_string(),
            ));
        }

        let default_volume =
            parse_var::<f32>(&lookup, "MUSIC_DEFAULT_VOLUME")?.unwrap_or(defaults.default_volume);
        if !(0.0..=1.0).contains(&default_volume) {
            return Err(MusicError::ConfigError(format!(
                "MUSIC_DEFAULT_VOLUME must be between 0.0 and 1.0, got {}",
                default_volume
            )));
        }

        Ok(Self {
            idle_timeout,
            skip_quorum,
            default_volume,
        })
    }
}

/// Everything the bot needs to start.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub command_prefix: String,
    pub player: PlayerConfig,
}

impl BotConfig {
    pub fn from_env() -> MusicResult<Self> {
        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| MusicError::ConfigError("Missing DISCORD_TOKEN".to_string()))?;
        let command_prefix = env::var("COMMAND_PREFIX").unwrap_or_else(|_| "!".to_string());

        Ok(Self {
            discord_token,
            command_prefix,
            player: PlayerConfig::from_env()?,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> MusicResult<Option<T>> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| MusicError::ConfigError(format!("Invalid value for {}: {}", key, raw))),
        None => Ok(None),
    }
}
