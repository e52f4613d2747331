//! This module aggregates all the command modules for the bot.

/// Commands related to music playback (requires the `music` feature).
pub mod music;
