use super::*;

/// Remove a track from the queue
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Position in the queue (1 is the next track)"]
    #[min = 1]
    position: Option<usize>,
) -> CommandResult {
    let controller = match active_controller(ctx) {
        Ok(controller) => controller,
        Err(err) => return reply_error(ctx, &err).await,
    };

    let position = position.unwrap_or(1);
    let removed = match position.checked_sub(1) {
        Some(index) => controller.remove_at(index),
        None => Err(MusicError::IndexOutOfRange {
            index: position,
            len: controller.queue().len(),
        }),
    };

    let reply = match removed {
        Ok(track) => embedded_messages::track_removed(&track, position),
        Err(MusicError::IndexOutOfRange { len: 0, .. }) => embedded_messages::queue_is_empty(),
        Err(MusicError::IndexOutOfRange { len, .. }) => {
            embedded_messages::invalid_queue_position(len)
        }
        Err(err) => embedded_messages::music_error(&err),
    };

    ctx.send(reply).await?;
    Ok(())
}
