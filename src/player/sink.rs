//! The seams between a [`PlaybackController`](super::PlaybackController) and
//! the voice transport.
//!
//! The controller never touches songbird or serenity directly; it plays
//! tracks through an [`AudioSink`], releases voice through a
//! [`VoiceConnection`] and announces tracks through a [`Notifier`].

use serenity::async_trait;
use serenity::model::id::ChannelId;
use tokio::sync::oneshot;

use super::error::{MusicError, MusicResult};
use super::track::TrackMetadata;

/// How the playback of a single track ended.
pub type PlaybackOutcome = MusicResult<()>;

/// One-shot completion callback handed to [`AudioSink::play`].
///
/// The sink must call [`finish`](Self::finish) when the track ends, with an
/// error if playback failed. Dropping it unfinished counts as a failure.
#[derive(Debug)]
pub struct PlaybackCompletion {
    sender: Option<oneshot::Sender<PlaybackOutcome>>,
}

impl PlaybackCompletion {
    /// Create a completion callback and the receiver the controller waits on.
    pub fn channel() -> (Self, oneshot::Receiver<PlaybackOutcome>) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// Signal that the track ended.
    pub fn finish(mut self, outcome: PlaybackOutcome) {
        if let Some(sender) = self.sender.take() {
            // The controller may have stopped waiting already.
            let _ = sender.send(outcome);
        }
    }
}

impl Drop for PlaybackCompletion {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(Err(MusicError::PlaybackFailure(
                "track ended without reporting completion".to_string(),
            )));
        }
    }
}

/// Plays audio for one guild. Only the owning controller calls into it.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Start playing `track` at `volume`, calling `completion` when it ends.
    async fn play(
        &self,
        track: &TrackMetadata,
        volume: f32,
        completion: PlaybackCompletion,
    ) -> MusicResult<()>;

    /// Change the gain of the active stream.
    fn set_volume(&self, volume: f32) -> MusicResult<()>;

    fn pause(&self) -> MusicResult<()>;

    fn resume(&self) -> MusicResult<()>;

    /// Stop the active stream, if any. Stopping ends the track, so the
    /// completion callback of the stopped track may fire afterwards.
    fn stop(&self) -> MusicResult<()>;

    async fn is_connected(&self) -> bool;
}

/// The voice channel connection of one guild.
#[async_trait]
pub trait VoiceConnection: Send + Sync {
    async fn connect(&self, channel_id: ChannelId) -> MusicResult<()>;

    async fn move_to(&self, channel_id: ChannelId) -> MusicResult<()>;

    /// Leave the voice channel. Must tolerate already being disconnected.
    async fn disconnect(&self) -> MusicResult<()>;
}

/// Delivers user-facing announcements to a text channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn now_playing(&self, channel_id: ChannelId, track: &TrackMetadata) -> MusicResult<()>;
}
