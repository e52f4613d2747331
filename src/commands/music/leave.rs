use super::*;
use tracing::info;

/// Clear the queue and leave the voice channel
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if ctx.data().music.remove(guild_id).await {
        info!("Left voice in guild {} on request of {}", guild_id, ctx.author().name);
        ctx.send(embedded_messages::left_voice_channel()).await?;
        return Ok(());
    }

    // No controller, but songbird may still hold a call from an earlier session
    match voice_manager::leave_channel(ctx.serenity_context(), guild_id).await {
        Ok(()) => {
            ctx.send(embedded_messages::left_voice_channel()).await?;
        }
        Err(err) => reply_error(ctx, &err).await?,
    }

    Ok(())
}
