use super::*;
use tracing::info;

/// Vote to skip the current track (the requester skips immediately)
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let outcome = active_controller(ctx).and_then(|controller| controller.vote_skip(ctx.author().id));

    match outcome {
        Ok(outcome) => {
            info!("Skip by {}: {:?}", ctx.author().name, outcome);
            ctx.send(embedded_messages::skip_outcome(&outcome)).await?;
        }
        Err(err) => reply_error(ctx, &err).await?,
    }

    Ok(())
}

/// Skip the current track without a vote
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn forceskip(ctx: Context<'_>) -> CommandResult {
    match active_controller(ctx).and_then(|controller| controller.force_skip()) {
        Ok(()) => {
            ctx.send(embedded_messages::skipped()).await?;
        }
        Err(err) => reply_error(ctx, &err).await?,
    }

    Ok(())
}
