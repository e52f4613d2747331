use super::*;
use crate::commands::music::audio_sources::{TrackResolver, youtube::YoutubeApi};
use tracing::{error, info};

/// Play a song from a YouTube URL or a search query
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"]
    #[rest]
    query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);

    let channel_id = match author_voice_channel(ctx) {
        Ok(channel_id) => channel_id,
        Err(err) => return reply_error(ctx, &err).await,
    };

    // Defer the response since resolving the query might take time
    ctx.defer().await?;

    let author = ctx.author();
    let track = match YoutubeApi.resolve(&query, author.id, &author.name).await {
        Ok(track) => track,
        Err(err) => {
            error!("Failed to resolve '{}': {}", query, err);
            return reply_error(ctx, &err).await;
        }
    };

    let controller = match connect_controller(ctx, channel_id).await {
        Ok(controller) => controller,
        Err(err) => return reply_error(ctx, &err).await,
    };

    match controller.enqueue(track.clone()) {
        Ok(position) => {
            info!("Queued '{}' at position {}", track.title, position);
            ctx.send(embedded_messages::added_to_queue(&track, position))
                .await?;
        }
        Err(err) => reply_error(ctx, &err).await?,
    }

    Ok(())
}
