//! songbird-backed implementations of the controller's audio and voice seams.

use parking_lot::Mutex;
use poise::serenity_prelude as serenity;
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use songbird::input::{Input, YoutubeDl};
use songbird::tracks::{Track, TrackHandle, TrackResult};
use songbird::{Event, Songbird, TrackEvent};
use std::sync::Arc;
use tracing::{debug, info};

use super::event_handlers::TrackEndNotifier;
use crate::player::{
    AudioSink, MusicError, MusicResult, PlaybackCompletion, TrackMetadata, VoiceConnection,
};

/// One guild's voice call, as seen by its playback controller.
pub struct SongbirdSession {
    guild_id: GuildId,
    manager: Arc<Songbird>,
    http_client: reqwest::Client,
    // Handle of the track currently playing, if any
    track: Mutex<Option<TrackHandle>>,
}

impl SongbirdSession {
    pub fn new(guild_id: GuildId, manager: Arc<Songbird>, http_client: reqwest::Client) -> Self {
        Self {
            guild_id,
            manager,
            http_client,
            track: Mutex::new(None),
        }
    }

    fn with_track<F>(&self, action: F) -> MusicResult<()>
    where
        F: FnOnce(&TrackHandle) -> TrackResult<()>,
    {
        match self.track.lock().as_ref() {
            Some(handle) => {
                action(handle).map_err(|e| MusicError::PlaybackFailure(e.to_string()))
            }
            None => Err(MusicError::NothingPlaying),
        }
    }
}

#[async_trait]
impl AudioSink for SongbirdSession {
    async fn play(
        &self,
        track: &TrackMetadata,
        volume: f32,
        completion: PlaybackCompletion,
    ) -> MusicResult<()> {
        let call = self
            .manager
            .get(self.guild_id)
            .ok_or(MusicError::NotConnected)?;

        let input: Input = YoutubeDl::new(self.http_client.clone(), track.url.clone()).into();
        let handle = {
            let mut handler = call.lock().await;
            handler.play(Track::from(input).volume(volume))
        };
        debug!("Track handle created for: {}", track.title);

        let completion = Arc::new(Mutex::new(Some(completion)));
        for event in [TrackEvent::End, TrackEvent::Error] {
            handle
                .add_event(
                    Event::Track(event),
                    TrackEndNotifier {
                        guild_id: self.guild_id,
                        completion: Arc::clone(&completion),
                    },
                )
                .map_err(|e| MusicError::PlaybackFailure(e.to_string()))?;
        }

        *self.track.lock() = Some(handle);
        Ok(())
    }

    fn set_volume(&self, volume: f32) -> MusicResult<()> {
        self.with_track(|handle| handle.set_volume(volume))
    }

    fn pause(&self) -> MusicResult<()> {
        self.with_track(|handle| handle.pause())
    }

    fn resume(&self) -> MusicResult<()> {
        self.with_track(|handle| handle.play())
    }

    fn stop(&self) -> MusicResult<()> {
        match self.track.lock().take() {
            Some(handle) => handle
                .stop()
                .map_err(|e| MusicError::PlaybackFailure(e.to_string())),
            None => Ok(()),
        }
    }

    async fn is_connected(&self) -> bool {
        match self.manager.get(self.guild_id) {
            Some(call) => call.lock().await.current_connection().is_some(),
            None => false,
        }
    }
}

#[async_trait]
impl VoiceConnection for SongbirdSession {
    async fn connect(&self, channel_id: ChannelId) -> MusicResult<()> {
        self.manager
            .join(self.guild_id, channel_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;
        info!("Joined voice channel {} in guild {}", channel_id, self.guild_id);
        Ok(())
    }

    async fn move_to(&self, channel_id: ChannelId) -> MusicResult<()> {
        // Joining while already in a call moves the existing call.
        self.connect(channel_id).await
    }

    async fn disconnect(&self) -> MusicResult<()> {
        if self.manager.get(self.guild_id).is_none() {
            return Ok(());
        }

        self.manager
            .remove(self.guild_id)
            .await
            .map_err(|e| MusicError::JoinError(format!("Failed to leave voice channel: {}", e)))?;
        info!("Left voice channel in guild {}", self.guild_id);
        Ok(())
    }
}
