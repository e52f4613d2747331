//! Music commands and the glue between poise, songbird and the playback core.

pub mod audio_sources;
pub mod utils;

pub mod clear;
pub mod join;
pub mod leave;
pub mod loop_track;
pub mod now;
pub mod pause;
pub mod play;
pub mod queue;
pub mod remove;
pub mod shuffle;
pub mod skip;
pub mod stop;
pub mod volume;

use crate::player::{
    ControllerParts, MusicError, MusicResult, PlaybackController, VoiceConnection,
};
use crate::{CommandResult, Context};
use poise::serenity_prelude as serenity;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;
use tracing::debug;

use utils::channel_notifier::ChannelNotifier;
use utils::songbird_session::SongbirdSession;
use utils::{embedded_messages, voice_manager};

pub(crate) fn guild_id(ctx: Context<'_>) -> MusicResult<GuildId> {
    ctx.guild_id().ok_or(MusicError::NotInGuild)
}

/// The voice channel the invoking user is sitting in.
pub(crate) fn author_voice_channel(ctx: Context<'_>) -> MusicResult<ChannelId> {
    let guild_id = guild_id(ctx)?;
    voice_manager::get_user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id)
}

/// The live controller of the invoking guild.
pub(crate) fn active_controller(ctx: Context<'_>) -> MusicResult<Arc<PlaybackController>> {
    let guild_id = guild_id(ctx)?;
    ctx.data().music.get(guild_id).ok_or(MusicError::NotConnected)
}

/// Return the guild's controller, joining `channel_id` and creating one if the
/// guild has none. An existing controller stays where it is.
pub(crate) async fn connect_controller(
    ctx: Context<'_>,
    channel_id: ChannelId,
) -> MusicResult<Arc<PlaybackController>> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    if let Some(controller) = data.music.get(guild_id) {
        return Ok(controller);
    }

    // Let an old controller finish leaving voice first
    data.music.settle(guild_id).await;

    let manager = voice_manager::get_songbird(ctx.serenity_context()).await?;
    let session = Arc::new(SongbirdSession::new(
        guild_id,
        manager,
        data.http_client.clone(),
    ));
    session.connect(channel_id).await?;

    let notifier = Arc::new(ChannelNotifier::new(ctx.serenity_context().http.clone()));
    let text_channel = ctx.channel_id();
    debug!(
        "Creating controller for guild {} announcing in {}",
        guild_id, text_channel
    );

    Ok(data.music.get_or_create(guild_id, || ControllerParts {
        sink: session.clone(),
        voice: session,
        notifier,
        text_channel,
    }))
}

/// Show a `MusicError` to the user instead of failing the command.
pub(crate) async fn reply_error(ctx: Context<'_>, err: &MusicError) -> CommandResult {
    ctx.send(embedded_messages::music_error(err)).await?;
    Ok(())
}
