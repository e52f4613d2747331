use super::*;

/// Pause the current track
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    match active_controller(ctx).and_then(|controller| controller.pause()) {
        Ok(()) => {
            ctx.send(embedded_messages::paused()).await?;
        }
        Err(err) => reply_error(ctx, &err).await?,
    }

    Ok(())
}

/// Resume the paused track
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    match active_controller(ctx).and_then(|controller| controller.resume()) {
        Ok(()) => {
            ctx.send(embedded_messages::resumed()).await?;
        }
        Err(err) => reply_error(ctx, &err).await?,
    }

    Ok(())
}
