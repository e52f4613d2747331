//! A Discord music bot: per-guild playback queues driven by a background
//! controller, exposed through poise slash and prefix commands.

pub mod config;
pub mod player;

#[cfg(feature = "music")]
pub mod commands;

use player::MusicManager;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// User data, which is stored and accessible in all command invocations
pub struct Data {
    /// Playback controllers, one per guild with an active voice session.
    pub music: Arc<MusicManager>,
    /// Shared HTTP client for streaming inputs.
    pub http_client: reqwest::Client,
}

impl Data {
    pub fn new(music: Arc<MusicManager>) -> Self {
        Self {
            music,
            http_client: reqwest::Client::new(),
        }
    }
}
