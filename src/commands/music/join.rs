use super::*;
use poise::serenity_prelude::{ChannelType, GuildChannel};
use tracing::info;

/// Move the existing controller, or connect a new one.
async fn join_or_move(ctx: Context<'_>, channel_id: ChannelId) -> MusicResult<()> {
    let guild_id = guild_id(ctx)?;
    match ctx.data().music.get(guild_id) {
        Some(controller) => controller.move_to(channel_id).await,
        None => connect_controller(ctx, channel_id).await.map(|_| ()),
    }
}

/// Join your voice channel
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn join(ctx: Context<'_>) -> CommandResult {
    let channel_id = match author_voice_channel(ctx) {
        Ok(channel_id) => channel_id,
        Err(err) => return reply_error(ctx, &err).await,
    };

    info!("Joining voice channel {} on request of {}", channel_id, ctx.author().name);
    match join_or_move(ctx, channel_id).await {
        Ok(()) => {
            ctx.send(embedded_messages::joined(channel_id)).await?;
        }
        Err(err) => reply_error(ctx, &err).await?,
    }

    Ok(())
}

/// Summon the bot to a voice channel
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn summon(
    ctx: Context<'_>,
    #[description = "Voice channel to join (defaults to yours)"]
    #[channel_types("Voice", "Stage")]
    channel: Option<GuildChannel>,
) -> CommandResult {
    let channel_id = match channel {
        Some(channel) if matches!(channel.kind, ChannelType::Voice | ChannelType::Stage) => {
            channel.id
        }
        Some(channel) => {
            ctx.send(embedded_messages::error(format!(
                "{} is not a voice channel.",
                channel.name
            )))
            .await?;
            return Ok(());
        }
        None => match author_voice_channel(ctx) {
            Ok(channel_id) => channel_id,
            Err(err) => return reply_error(ctx, &err).await,
        },
    };

    match join_or_move(ctx, channel_id).await {
        Ok(()) => {
            ctx.send(embedded_messages::joined(channel_id)).await?;
        }
        Err(err) => reply_error(ctx, &err).await?,
    }

    Ok(())
}
