use super::*;

/// Shuffle the queued tracks
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn shuffle(ctx: Context<'_>) -> CommandResult {
    let controller = match active_controller(ctx) {
        Ok(controller) => controller,
        Err(err) => return reply_error(ctx, &err).await,
    };

    let len = controller.queue().len();
    if len == 0 {
        ctx.send(embedded_messages::queue_is_empty()).await?;
        return Ok(());
    }

    controller.shuffle_queue();
    ctx.send(embedded_messages::shuffled(len)).await?;
    Ok(())
}
