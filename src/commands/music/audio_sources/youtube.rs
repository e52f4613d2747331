//! Implements `TrackResolver` by shelling out to the `yt-dlp` command-line tool.

use serde::Deserialize;
use serenity::async_trait;
use serenity::model::id::UserId;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

use super::{AudioSource, TrackResolver};
use crate::player::{MusicError, MusicResult, TrackMetadata};

/// The subset of `yt-dlp --dump-json` output the bot cares about.
#[derive(Debug, Default, Deserialize)]
struct VideoInfo {
    title: Option<String>,
    webpage_url: Option<String>,
    duration: Option<f64>,
    thumbnail: Option<String>,
    view_count: Option<u64>,
    upload_date: Option<String>,
    // Present when the result is a playlist or a search page
    #[serde(default)]
    entries: Vec<VideoInfo>,
}

/// Resolves tracks through `yt-dlp`.
#[derive(Default)]
pub struct YoutubeApi;

#[async_trait]
impl TrackResolver for YoutubeApi {
    async fn resolve(
        &self,
        query: &str,
        requested_by: UserId,
        requester_name: &str,
    ) -> MusicResult<TrackMetadata> {
        let target = Self::search_target(query);
        info!("Extracting video information for: {}", target);

        // Execute yt-dlp to get metadata as JSON for the given URL or search.
        let output = Command::new("yt-dlp")
            .args([
                "-j",            // Output as JSON
                "--no-playlist", // Don't process playlists
                &target,
            ])
            .output()
            .await
            .map_err(|e| MusicError::ResolutionError(format!("Failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MusicError::ResolutionError(format!(
                "Couldn't find anything that matches `{}`: {}",
                query,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_metadata(&stdout, requested_by, requester_name)
    }
}

impl YoutubeApi {
    /// YouTube watch URLs are resolved directly; anything else is searched for.
    pub fn search_target(query: &str) -> String {
        let query = query.trim();
        if Self::is_youtube_url(query) {
            query.to_string()
        } else {
            format!("ytsearch:{}", query)
        }
    }

    /// Checks if the input string is a YouTube watch URL with a video id.
    pub fn is_youtube_url(query: &str) -> bool {
        if !AudioSource::is_url(query) {
            return false;
        }
        let Ok(url) = Url::parse(query) else {
            return false;
        };

        match url.host_str() {
            Some("youtu.be") => !url.path().trim_matches('/').is_empty(),
            Some("youtube.com" | "www.youtube.com" | "m.youtube.com") => {
                url.path().starts_with("/watch") && url.query_pairs().any(|(key, _)| key == "v")
            }
            _ => false,
        }
    }

    /// Convert `yt-dlp -j` output into `TrackMetadata`, using the first entry
    /// of a playlist or search result.
    pub fn parse_metadata(
        output: &str,
        requested_by: UserId,
        requester_name: &str,
    ) -> MusicResult<TrackMetadata> {
        // One JSON document per line; the first is the one we asked for.
        let line = output
            .lines()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| MusicError::ResolutionError("yt-dlp returned nothing".to_string()))?;

        let mut info: VideoInfo = serde_json::from_str(line).map_err(|e| {
            MusicError::ResolutionError(format!("Failed to parse video metadata: {}", e))
        })?;

        if !info.entries.is_empty() {
            info = info.entries.swap_remove(0);
        }

        let url = info.webpage_url.ok_or_else(|| {
            MusicError::ResolutionError("Video metadata has no webpage URL".to_string())
        })?;

        let metadata = TrackMetadata {
            title: info.title.unwrap_or_else(|| "Unknown Title".to_string()),
            url,
            duration: info
                .duration
                .filter(|seconds| *seconds > 0.0)
                .map(Duration::from_secs_f64),
            thumbnail: info.thumbnail,
            view_count: info.view_count,
            upload_date: info.upload_date,
            requested_by,
            requester_name: requester_name.to_string(),
        };
        debug!("Resolved track: {:?}", metadata);

        Ok(metadata)
    }
}
