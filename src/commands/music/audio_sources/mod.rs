//! Track resolution: turning a user's query or URL into `TrackMetadata`.
//!
//! The bot does not extract metadata itself; it asks an external resolver
//! (currently `yt-dlp`) and only parses what comes back.

/// Submodule implementing `TrackResolver` on top of `yt-dlp`.
pub mod youtube;

use serenity::async_trait;
use serenity::model::id::UserId;
use url::Url;

use crate::player::{MusicResult, TrackMetadata};

/// Trait defining the common interface for track resolvers.
/// Requires `Send + Sync` to be safely used across async tasks.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolve a URL or free-text search into a single playable track.
    ///
    /// Fails with `MusicError::ResolutionError` when nothing playable matches;
    /// callers must not enqueue anything in that case.
    async fn resolve(
        &self,
        query: &str,
        requested_by: UserId,
        requester_name: &str,
    ) -> MusicResult<TrackMetadata>;
}

/// A utility struct providing general helper functions related to audio sources.
pub struct AudioSource;

impl AudioSource {
    /// Performs a basic check if the input string can be parsed as a URL.
    /// Does not validate if the URL is actually reachable or supported by any resolver.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input).is_ok()
    }
}
