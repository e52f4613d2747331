//! Defines `TrackMetadata`, the immutable description of a playable track as
//! produced by a track resolver and consumed by the queue and controller.

use serenity::model::id::UserId;
use std::time::Duration;

/// Unified representation of metadata for a playable track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    /// The title of the track.
    pub title: String,
    /// The page URL handed to the streaming input when the track is played.
    pub url: String,
    /// The duration of the track, if known.
    pub duration: Option<Duration>,
    /// URL to a thumbnail image for the track, if available.
    pub thumbnail: Option<String>,
    /// Total view count reported by the source, if available.
    pub view_count: Option<u64>,
    /// Upload date in `YYYYMMDD` form, if available.
    pub upload_date: Option<String>,
    /// The user who requested the track.
    pub requested_by: UserId,
    /// Display name of the requester at the time of the request.
    pub requester_name: String,
}

impl TrackMetadata {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        requested_by: UserId,
        requester_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            duration: None,
            thumbnail: None,
            view_count: None,
            upload_date: None,
            requested_by,
            requester_name: requester_name.into(),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Whether `user` is the one who queued this track.
    pub fn is_requested_by(&self, user: UserId) -> bool {
        self.requested_by == user
    }
}
