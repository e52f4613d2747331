use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::{ChannelId, CreateEmbed, CreateEmbedFooter, Mentionable};
use std::time::Duration;

use super::{describe_duration, format_duration, format_upload_date, readable_view_count};
use crate::player::{MusicError, QueuePage, SkipOutcome, TrackMetadata};

const BLURPLE: u32 = 0x5865f2;
const GREEN: u32 = 0x00ff00;
const RED: u32 = 0xff0000;

/// Parse the metadata for the now playing and added to queue embeds
fn parse_metadata(metadata: &TrackMetadata) -> (String, String, String) {
    let title = metadata.title.clone();
    let url = metadata.url.clone();
    let duration_str = metadata
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "Unknown duration".to_string());

    (title, url, duration_str)
}

fn success(title: &str, description: impl Into<String>) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title(title)
            .description(description)
            .color(GREEN),
    )
}

/// An ephemeral error embed
pub fn error(description: impl Into<String>) -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("❌ Error")
                .description(description)
                .color(RED),
        )
        .ephemeral(true)
}

/// Turn a `MusicError` into something worth showing a user
pub fn music_error(err: &MusicError) -> CreateReply {
    let description = match err {
        MusicError::UserNotInVoiceChannel => "You are not connected to any voice channel.".to_string(),
        MusicError::NotConnected => "Not connected to any voice channel.".to_string(),
        MusicError::NothingPlaying => "Nothing being played at the moment.".to_string(),
        MusicError::EmptyQueue => "The queue is currently empty.".to_string(),
        MusicError::ResolutionError(reason) => {
            format!("An error occurred while processing this request: {}", reason)
        }
        other => other.to_string(),
    };
    error(description)
}

/// Create an embed for when a song is now playing
pub fn now_playing(metadata: &TrackMetadata) -> CreateEmbed {
    let duration = metadata
        .duration
        .map(describe_duration)
        .unwrap_or_else(|| "Unknown".to_string());
    let views = metadata
        .view_count
        .map(readable_view_count)
        .unwrap_or_else(|| "Unknown".to_string());
    let upload_date = metadata
        .upload_date
        .as_deref()
        .map(format_upload_date)
        .unwrap_or_else(|| "Unknown".to_string());

    let mut embed = CreateEmbed::new()
        .title("🎵 Now Playing 🎵")
        .description(format!("```yaml\n{}\n```", metadata.title))
        .field("Duration", duration, true)
        .field("Views", views, true)
        .field("Upload Date", upload_date, true)
        .field("Requested by", metadata.requested_by.mention().to_string(), true)
        .field("Watch URL", format!("[Click here]({})", metadata.url), false)
        .footer(CreateEmbedFooter::new("Enjoy your music! 🎧"))
        .color(BLURPLE);

    if let Some(thumbnail) = &metadata.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }

    embed
}

/// Reply for the `now` command
pub fn current_track(current: Option<&TrackMetadata>, looping: bool, volume: f32) -> CreateReply {
    match current {
        Some(track) => CreateReply::default().embed(
            now_playing(track)
                .field("Loop", if looping { "On" } else { "Off" }, true)
                .field("Volume", format!("{}%", (volume * 100.0).round()), true),
        ),
        None => nothing_playing(),
    }
}

/// Create an embed for when a song is added to the queue
pub fn added_to_queue(metadata: &TrackMetadata, position: usize) -> CreateReply {
    let (title, url, duration_str) = parse_metadata(metadata);

    let mut embed = CreateEmbed::new()
        .title("🔊 Queued")
        .description(format!("[{}]({})", title, url))
        .field("Duration", format!("`{}`", duration_str), true)
        .field("Position", format!("`#{}`", position), true)
        .color(GREEN);

    if let Some(thumbnail) = &metadata.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }

    CreateReply::default().embed(embed)
}

/// Create an embed for one page of the music queue
pub fn queue_page(
    page: &QueuePage<TrackMetadata>,
    current: Option<&TrackMetadata>,
    total_duration: Duration,
) -> CreateReply {
    let mut description = String::new();

    if let Some(track) = current {
        description.push_str(&format!(
            "**🎵 Now Playing**\n[{}]({})\n\n",
            track.title, track.url
        ));
    }

    for (n, track) in page.items.iter().enumerate() {
        description.push_str(&format!(
            "`{}.` [**{}**]({})",
            page.offset + n + 1,
            track.title,
            track.url
        ));
        if let Some(duration) = track.duration {
            description.push_str(&format!(" -- `{}`", format_duration(duration)));
        }
        description.push('\n');
    }

    let embed = CreateEmbed::new()
        .title(format!(
            "🎶 Current Queue: {} remaining 🎶",
            describe_duration(total_duration)
        ))
        .description(description)
        .footer(CreateEmbedFooter::new(format!(
            "Page {}/{} | {} tracks",
            page.page, page.total_pages, page.total_len
        )))
        .color(BLURPLE);

    CreateReply::default().embed(embed)
}

pub fn invalid_page(total_pages: usize) -> CreateReply {
    error(format!(
        "Invalid page number. Please choose between 1 and {}.",
        total_pages
    ))
}

pub fn queue_is_empty() -> CreateReply {
    error("The queue is currently empty.")
}

pub fn nothing_playing() -> CreateReply {
    error("Nothing being played at the moment.")
}

pub fn invalid_queue_position(queue_len: usize) -> CreateReply {
    error(format!(
        "Invalid position. Please choose between 1 and {}.",
        queue_len
    ))
}

pub fn track_removed(metadata: &TrackMetadata, position: usize) -> CreateReply {
    success(
        "🗑️ Removed Track",
        format!("Removed `#{}` [{}]({})", position, metadata.title, metadata.url),
    )
}

pub fn skip_outcome(outcome: &SkipOutcome) -> CreateReply {
    match outcome {
        SkipOutcome::Skipped => success("⏭️ Skipped Track", "Skipped to the next track"),
        SkipOutcome::VoteAdded { votes, required } => success(
            "🗳️ Skip Vote",
            format!("Skip vote added, currently at **{}/{}**", votes, required),
        ),
        SkipOutcome::AlreadyVoted { votes, required } => error(format!(
            "You have already voted to skip this song (**{}/{}**).",
            votes, required
        )),
    }
}

pub fn skipped() -> CreateReply {
    success("⏭️ Skipped Track", "Skipped to the next track")
}

pub fn joined(channel_id: ChannelId) -> CreateReply {
    success("🔊 Joined", format!("Connected to {}", channel_id.mention()))
}

pub fn stopped() -> CreateReply {
    success("⏹️ Stopped", "Stopped playback, cleared the queue and left the voice channel")
}

pub fn left_voice_channel() -> CreateReply {
    success("🕊️ Left", "Cleared the queue and left the voice channel")
}

pub fn queue_cleared(removed: usize) -> CreateReply {
    success("☕ Queue Cleared", format!("Removed {} tracks from the queue", removed))
}

pub fn shuffled(len: usize) -> CreateReply {
    success("🔀 Shuffled", format!("Shuffled {} tracks", len))
}

pub fn volume_set(percent: i64) -> CreateReply {
    success("🔉 Volume", format!("Volume of the player set to {}%", percent))
}

pub fn volume_out_of_range() -> CreateReply {
    error("Volume must be between 0 and 100")
}

pub fn loop_toggled(looping: bool) -> CreateReply {
    if looping {
        success("🔁 Loop", "Looping the current track")
    } else {
        success("➡️ Loop", "Stopped looping the current track")
    }
}

pub fn paused() -> CreateReply {
    success("⏸️ Paused", "Paused the current track")
}

pub fn resumed() -> CreateReply {
    success("▶️ Resumed", "Resumed the current track")
}
