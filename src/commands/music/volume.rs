use super::*;

/// Set the playback volume
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume in percent (0-100)"] percent: i64,
) -> CommandResult {
    if !(0..=100).contains(&percent) {
        ctx.send(embedded_messages::volume_out_of_range()).await?;
        return Ok(());
    }

    let result = active_controller(ctx)
        .and_then(|controller| controller.set_volume(percent as f32 / 100.0));

    match result {
        Ok(()) => {
            ctx.send(embedded_messages::volume_set(percent)).await?;
        }
        Err(err) => reply_error(ctx, &err).await?,
    }

    Ok(())
}
