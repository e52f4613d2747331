use super::*;

/// Show the track that is currently playing
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn now(ctx: Context<'_>) -> CommandResult {
    let reply = match active_controller(ctx) {
        Ok(controller) => embedded_messages::current_track(
            controller.current_track().as_ref(),
            controller.is_looping(),
            controller.volume(),
        ),
        Err(_) => embedded_messages::nothing_playing(),
    };

    ctx.send(reply).await?;
    Ok(())
}
