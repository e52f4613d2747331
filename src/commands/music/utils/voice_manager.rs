//! Lookups against serenity's cache and the songbird voice manager.

use poise::serenity_prelude as serenity;
use serenity::client::Context;
use serenity::model::id::{ChannelId, GuildId, UserId};
use songbird::Songbird;
use std::sync::Arc;

use crate::player::{MusicError, MusicResult};

/// Get the Songbird voice client from the context
pub async fn get_songbird(ctx: &Context) -> MusicResult<Arc<Songbird>> {
    songbird::get(ctx).await.ok_or(MusicError::NoVoiceManager)
}

/// Get the voice channel ID that the user is currently in
pub fn get_user_voice_channel(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
) -> MusicResult<ChannelId> {
    // Get the guild
    let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;

    // Get the voice state of the user
    let voice_state = guild
        .voice_states
        .get(&user_id)
        .ok_or(MusicError::UserNotInVoiceChannel)?;

    voice_state
        .channel_id
        .ok_or(MusicError::UserNotInVoiceChannel)
}

/// Leave the voice channel of a guild that has no playback controller.
pub async fn leave_channel(ctx: &Context, guild_id: GuildId) -> MusicResult<()> {
    let songbird = get_songbird(ctx).await?;

    // Check if we're in a voice channel
    if songbird.get(guild_id).is_none() {
        return Err(MusicError::NotConnected);
    }

    songbird
        .remove(guild_id)
        .await
        .map_err(|e| MusicError::JoinError(format!("Failed to leave voice channel: {}", e)))
}
