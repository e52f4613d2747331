use poise::serenity_prelude as serenity;
use serenity::all::CreateMessage;
use serenity::async_trait;
use serenity::model::id::ChannelId;
use std::sync::Arc;

use super::embedded_messages;
use crate::player::{MusicError, MusicResult, Notifier, TrackMetadata};

/// Posts "now playing" embeds to a text channel.
pub struct ChannelNotifier {
    http: Arc<serenity::Http>,
}

impl ChannelNotifier {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn now_playing(&self, channel_id: ChannelId, track: &TrackMetadata) -> MusicResult<()> {
        let message = CreateMessage::new().embed(embedded_messages::now_playing(track));

        channel_id
            .send_message(self.http.clone(), message)
            .await
            .map_err(|e| MusicError::PlaybackFailure(format!("Failed to announce track: {}", e)))?;

        Ok(())
    }
}
