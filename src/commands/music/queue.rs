use super::*;

const TRACKS_PER_PAGE: usize = 10;

/// Show the current music queue
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn queue(
    ctx: Context<'_>,
    #[description = "Page number (10 tracks per page)"]
    #[min = 1]
    page: Option<usize>,
) -> CommandResult {
    let controller = match active_controller(ctx) {
        Ok(controller) => controller,
        Err(_) => {
            ctx.send(embedded_messages::queue_is_empty()).await?;
            return Ok(());
        }
    };

    let queue = controller.queue();
    let reply = match queue.page(page.unwrap_or(1), TRACKS_PER_PAGE) {
        Ok(page) => embedded_messages::queue_page(
            &page,
            controller.current_track().as_ref(),
            queue.total_duration(),
        ),
        Err(MusicError::IndexOutOfRange { len, .. }) => embedded_messages::invalid_page(len),
        Err(_) => embedded_messages::queue_is_empty(),
    };

    ctx.send(reply).await?;
    Ok(())
}
