use super::*;

/// Stop playback, clear the queue and leave the voice channel
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if ctx.data().music.remove(guild_id).await {
        ctx.send(embedded_messages::stopped()).await?;
    } else {
        reply_error(ctx, &MusicError::NotConnected).await?;
    }

    Ok(())
}
