use super::*;

/// Toggle looping of the current track
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    rename = "loop",
    category = "Music"
)]
pub async fn loop_track(ctx: Context<'_>) -> CommandResult {
    let controller = match active_controller(ctx) {
        Ok(controller) if controller.is_playing() => controller,
        Ok(_) => {
            ctx.send(embedded_messages::nothing_playing()).await?;
            return Ok(());
        }
        Err(err) => return reply_error(ctx, &err).await,
    };

    let looping = controller.toggle_loop();
    ctx.send(embedded_messages::loop_toggled(looping)).await?;
    Ok(())
}
