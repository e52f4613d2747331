use parking_lot::Mutex;
use poise::serenity_prelude as serenity;
use serenity::async_trait;
use songbird::tracks::PlayMode;
use songbird::{Event, EventContext, EventHandler};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::player::{MusicError, PlaybackCompletion};

/// Fires the controller's completion callback when a songbird track ends or errors.
///
/// The same notifier is registered for both `TrackEvent::End` and
/// `TrackEvent::Error`; whichever fires first reports the outcome.
pub struct TrackEndNotifier {
    pub guild_id: serenity::GuildId,
    pub completion: Arc<Mutex<Option<PlaybackCompletion>>>,
}

#[async_trait]
impl EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(tracks) = ctx {
            let outcome = match tracks.first().map(|(state, _)| &state.playing) {
                Some(PlayMode::Errored(err)) => {
                    warn!("Track errored in guild {}: {:?}", self.guild_id, err);
                    Err(MusicError::PlaybackFailure(format!("{:?}", err)))
                }
                _ => Ok(()),
            };

            if let Some(completion) = self.completion.lock().take() {
                debug!("Track ended for guild {}", self.guild_id);
                completion.finish(outcome);
            }
        }

        Some(Event::Cancel)
    }
}
