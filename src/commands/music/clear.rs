use super::*;

/// Remove every queued track, keeping the current one
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn clear(ctx: Context<'_>) -> CommandResult {
    match active_controller(ctx) {
        Ok(controller) => {
            let removed = controller.clear_queue();
            ctx.send(embedded_messages::queue_cleared(removed)).await?;
        }
        Err(err) => reply_error(ctx, &err).await?,
    }

    Ok(())
}
