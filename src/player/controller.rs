//! The per-guild playback controller.
//!
//! Each controller owns a [`TrackQueue`] and one background task. The task
//! alternates between two suspension points:
//!
//! * `AwaitingTrack`: waiting on the queue, bounded by the idle timeout. If the
//!   timeout elapses the controller tears itself down and asks the registry to
//!   forget it.
//! * `Playing`: waiting for the sink's completion callback or a skip.
//!
//! Losing the voice connection is terminal: the controller tears down
//! instead of failing its way through the rest of the queue.
//!
//! Commands mutate the controller through its methods, which only ever take
//! the state lock briefly and never await while holding it.

use parking_lot::Mutex;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::error::{MusicError, MusicResult};
use super::sink::{AudioSink, Notifier, PlaybackCompletion, PlaybackOutcome, VoiceConnection};
use super::track::TrackMetadata;
use super::track_queue::TrackQueue;
use crate::config::PlayerConfig;

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

/// Called once a controller has torn itself down, with its guild and id.
pub(crate) type DisconnectHook = Box<dyn Fn(GuildId, u64) + Send + Sync>;

/// Where the controller's state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    AwaitingTrack,
    Playing,
    /// Terminal. The controller has to be replaced to play again.
    Disconnected,
}

/// Result of a skip vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipOutcome {
    /// The current track was skipped.
    Skipped,
    /// The vote counted but the quorum has not been reached yet.
    VoteAdded { votes: usize, required: usize },
    /// This user has already voted on the current track.
    AlreadyVoted { votes: usize, required: usize },
}

/// The external collaborators a controller is built from.
pub struct ControllerParts {
    pub sink: Arc<dyn AudioSink>,
    pub voice: Arc<dyn VoiceConnection>,
    pub notifier: Arc<dyn Notifier>,
    /// Text channel that receives "now playing" announcements.
    pub text_channel: ChannelId,
}

struct PlayerState {
    phase: PlayerPhase,
    current: Option<TrackMetadata>,
    looping: bool,
    volume: f32,
    paused: bool,
    skip_votes: HashSet<UserId>,
    // Fires the skip of the track currently playing; replaced per track.
    skip_tx: Option<oneshot::Sender<()>>,
}

impl PlayerState {
    fn new(volume: f32) -> Self {
        Self {
            phase: PlayerPhase::AwaitingTrack,
            current: None,
            looping: false,
            volume,
            paused: false,
            skip_votes: HashSet::new(),
            skip_tx: None,
        }
    }

    fn is_playing(&self) -> bool {
        self.phase == PlayerPhase::Playing && self.current.is_some()
    }

    fn skip(&mut self) {
        self.skip_votes.clear();
        if let Some(skip_tx) = self.skip_tx.take() {
            let _ = skip_tx.send(());
        }
    }
}

pub struct PlaybackController {
    id: u64,
    guild_id: GuildId,
    config: PlayerConfig,
    queue: Arc<TrackQueue>,
    state: Mutex<PlayerState>,
    sink: Arc<dyn AudioSink>,
    voice: Arc<dyn VoiceConnection>,
    notifier: Arc<dyn Notifier>,
    text_channel: ChannelId,
    task: Mutex<Option<JoinHandle<()>>>,
    torn_down: AtomicBool,
    // Flips to true once teardown has released voice
    released: watch::Sender<bool>,
    on_disconnect: Option<DisconnectHook>,
}

impl PlaybackController {
    /// Create a controller for `guild_id` and start its background task.
    pub fn spawn(guild_id: GuildId, parts: ControllerParts, config: PlayerConfig) -> Arc<Self> {
        Self::start(guild_id, parts, config, None)
    }

    pub(crate) fn spawn_with_hook(
        guild_id: GuildId,
        parts: ControllerParts,
        config: PlayerConfig,
        on_disconnect: DisconnectHook,
    ) -> Arc<Self> {
        Self::start(guild_id, parts, config, Some(on_disconnect))
    }

    fn start(
        guild_id: GuildId,
        parts: ControllerParts,
        config: PlayerConfig,
        on_disconnect: Option<DisconnectHook>,
    ) -> Arc<Self> {
        let controller = Arc::new(Self {
            id: NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed),
            guild_id,
            queue: Arc::new(TrackQueue::new()),
            state: Mutex::new(PlayerState::new(config.default_volume)),
            config,
            sink: parts.sink,
            voice: parts.voice,
            notifier: parts.notifier,
            text_channel: parts.text_channel,
            task: Mutex::new(None),
            torn_down: AtomicBool::new(false),
            released: watch::Sender::new(false),
            on_disconnect,
        });

        let task = tokio::spawn(Arc::clone(&controller).run());
        *controller.task.lock() = Some(task);
        info!("Started playback controller for guild {}", guild_id);

        controller
    }

    async fn run(self: Arc<Self>) {
        let mut replay: Option<TrackMetadata> = None;

        loop {
            if self.is_disconnected() {
                return;
            }

            let track = match replay.take() {
                Some(track) => track,
                None => match self.next_track().await {
                    Some(track) => track,
                    None => {
                        info!(
                            "No tracks queued in guild {} for {:?}. Disconnecting...",
                            self.guild_id, self.config.idle_timeout
                        );
                        self.disconnect_from_task().await;
                        return;
                    }
                },
            };

            let outcome = self.play_track(&track).await;
            if let Err(MusicError::NotConnected) = outcome {
                warn!(
                    "Lost the voice connection in guild {} before playing '{}'. Disconnecting...",
                    self.guild_id, track.title
                );
                self.disconnect_from_task().await;
                return;
            }
            replay = self.finish_track(track, outcome);
        }
    }

    /// Wait for the next queued track, or `None` once the idle timeout elapses.
    async fn next_track(&self) -> Option<TrackMetadata> {
        {
            let mut state = self.state.lock();
            if state.phase == PlayerPhase::Disconnected {
                return None;
            }
            state.phase = PlayerPhase::AwaitingTrack;
        }
        debug!("Guild {} is waiting for the next track", self.guild_id);

        self.queue
            .dequeue_timeout(self.config.idle_timeout)
            .await
            .ok()
    }

    async fn play_track(&self, track: &TrackMetadata) -> PlaybackOutcome {
        if !self.sink.is_connected().await {
            return Err(MusicError::NotConnected);
        }

        let (skip_tx, skip_rx) = oneshot::channel();
        let volume = {
            let mut state = self.state.lock();
            if state.phase == PlayerPhase::Disconnected {
                return Err(MusicError::Cancelled);
            }
            state.phase = PlayerPhase::Playing;
            state.current = Some(track.clone());
            state.paused = false;
            state.skip_votes.clear();
            state.skip_tx = Some(skip_tx);
            state.volume
        };

        info!("Now playing '{}' in guild {}", track.title, self.guild_id);

        let (completion, finished) = PlaybackCompletion::channel();
        self.sink.play(track, volume, completion).await?;

        if self.is_disconnected() {
            let _ = self.sink.stop();
            return Err(MusicError::Cancelled);
        }

        if let Err(err) = self.notifier.now_playing(self.text_channel, track).await {
            warn!(
                "Failed to announce '{}' in guild {}: {}",
                track.title, self.guild_id, err
            );
        }

        tokio::select! {
            outcome = finished => outcome.unwrap_or_else(|_| {
                Err(MusicError::PlaybackFailure("completion callback dropped".to_string()))
            }),
            Ok(()) = skip_rx => {
                info!("Skipping '{}' in guild {}", track.title, self.guild_id);
                if let Err(err) = self.sink.stop() {
                    warn!("Failed to stop skipped track in guild {}: {}", self.guild_id, err);
                }
                Ok(())
            }
        }
    }

    /// Settle the state after a track ended. Returns the track again if it
    /// should be replayed.
    fn finish_track(&self, track: TrackMetadata, outcome: PlaybackOutcome) -> Option<TrackMetadata> {
        let mut state = self.state.lock();
        state.skip_votes.clear();
        state.skip_tx = None;
        state.paused = false;

        if state.phase == PlayerPhase::Disconnected {
            return None;
        }

        if let Err(err) = outcome {
            error!(
                "Error playing '{}' in guild {}: {}",
                track.title, self.guild_id, err
            );
            if state.looping {
                state.looping = false;
                warn!(
                    "Disabled loop in guild {} because '{}' failed to play",
                    self.guild_id, track.title
                );
            }
        }

        if state.looping {
            debug!("Looping '{}' in guild {}", track.title, self.guild_id);
            Some(track)
        } else {
            state.current = None;
            state.phase = PlayerPhase::AwaitingTrack;
            None
        }
    }

    /// Tear down from inside the background task.
    async fn disconnect_from_task(&self) {
        // Whoever takes the handle owns the teardown. If `stop` already took
        // it, this task is being aborted and `stop` finishes the job.
        if self.task.lock().take().is_none() {
            return;
        }
        self.teardown().await;
    }

    /// Stop playback, clear the queue and leave voice. Valid in any phase;
    /// calling it again does nothing. Returns once voice has been released.
    pub async fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
        self.teardown().await;
        self.wait_released().await;
    }

    /// Wait until teardown has finished releasing voice.
    pub async fn wait_released(&self) {
        let mut released = self.released.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = released.wait_for(|done| *done).await;
    }

    /// Whether teardown has finished and voice is released.
    pub fn is_released(&self) -> bool {
        *self.released.borrow()
    }

    async fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            debug!("Controller for guild {} already torn down", self.guild_id);
            return;
        }

        {
            let mut state = self.state.lock();
            state.phase = PlayerPhase::Disconnected;
            state.current = None;
            state.paused = false;
            state.skip_votes.clear();
            state.skip_tx = None;
        }

        let dropped = self.queue.clear();

        if let Err(err) = self.sink.stop() {
            warn!("Failed to stop audio in guild {}: {}", self.guild_id, err);
        }
        if let Err(err) = self.voice.disconnect().await {
            warn!("Failed to leave voice in guild {}: {}", self.guild_id, err);
        }

        info!(
            "Playback controller for guild {} disconnected ({} queued tracks dropped)",
            self.guild_id, dropped
        );

        self.released.send_replace(true);
        if let Some(on_disconnect) = &self.on_disconnect {
            on_disconnect(self.guild_id, self.id);
        }
    }

    /// Add a track to the end of the queue, returning its 1-based position.
    pub fn enqueue(&self, track: TrackMetadata) -> MusicResult<usize> {
        if self.is_disconnected() {
            return Err(MusicError::NotConnected);
        }
        debug!("Queued '{}' in guild {}", track.title, self.guild_id);
        let position = self.queue.enqueue(track);

        // A teardown may have cleared the queue between the check and the push.
        if self.is_disconnected() {
            self.queue.clear();
            return Err(MusicError::NotConnected);
        }
        Ok(position)
    }

    pub fn peek_queue(&self) -> MusicResult<TrackMetadata> {
        self.queue.peek()
    }

    pub fn snapshot_queue(&self) -> Vec<TrackMetadata> {
        self.queue.snapshot()
    }

    /// Remove the queued track at a zero-based position.
    pub fn remove_at(&self, index: usize) -> MusicResult<TrackMetadata> {
        let removed = self.queue.remove_at(index)?;
        info!(
            "Removed '{}' from the queue of guild {}",
            removed.title, self.guild_id
        );
        Ok(removed)
    }

    pub fn shuffle_queue(&self) {
        self.queue.shuffle();
        info!("Shuffled the queue of guild {}", self.guild_id);
    }

    /// Drop every queued track without touching the current one.
    pub fn clear_queue(&self) -> usize {
        let removed = self.queue.clear();
        info!("Cleared {} tracks from guild {}", removed, self.guild_id);
        removed
    }

    /// Vote to skip the current track. The requester of the track skips it
    /// outright; anyone else needs the configured quorum of distinct voters.
    pub fn vote_skip(&self, voter: UserId) -> MusicResult<SkipOutcome> {
        let mut state = self.state.lock();
        let requested_by = match (&state.phase, &state.current) {
            (PlayerPhase::Playing, Some(current)) => current.requested_by,
            _ => return Err(MusicError::NothingPlaying),
        };

        if voter == requested_by {
            debug!("Requester {} skipped in guild {}", voter, self.guild_id);
            state.skip();
            return Ok(SkipOutcome::Skipped);
        }

        let required = self.config.skip_quorum;
        if !state.skip_votes.insert(voter) {
            return Ok(SkipOutcome::AlreadyVoted {
                votes: state.skip_votes.len(),
                required,
            });
        }

        let votes = state.skip_votes.len();
        if votes >= required {
            debug!("Skip quorum reached in guild {}", self.guild_id);
            state.skip();
            Ok(SkipOutcome::Skipped)
        } else {
            Ok(SkipOutcome::VoteAdded { votes, required })
        }
    }

    /// Skip the current track regardless of votes.
    pub fn force_skip(&self) -> MusicResult<()> {
        let mut state = self.state.lock();
        if !state.is_playing() {
            return Err(MusicError::NothingPlaying);
        }
        state.skip();
        Ok(())
    }

    /// Set the volume, applying it to the active stream straight away.
    pub fn set_volume(&self, volume: f32) -> MusicResult<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(MusicError::VolumeOutOfRange(volume));
        }

        let mut state = self.state.lock();
        state.volume = volume;
        if state.is_playing() {
            if let Err(err) = self.sink.set_volume(volume) {
                warn!(
                    "Failed to apply volume {} in guild {}: {}",
                    volume, self.guild_id, err
                );
            }
        }
        info!("Volume set to {} in guild {}", volume, self.guild_id);
        Ok(())
    }

    /// Enable or disable looping of the current track. Takes effect when the
    /// current track ends.
    pub fn set_loop(&self, looping: bool) {
        self.state.lock().looping = looping;
        info!("Loop set to {} in guild {}", looping, self.guild_id);
    }

    /// Flip the loop flag, returning the new value.
    pub fn toggle_loop(&self) -> bool {
        let mut state = self.state.lock();
        state.looping = !state.looping;
        info!("Loop set to {} in guild {}", state.looping, self.guild_id);
        state.looping
    }

    pub fn pause(&self) -> MusicResult<()> {
        let mut state = self.state.lock();
        if !state.is_playing() {
            return Err(MusicError::NothingPlaying);
        }
        self.sink.pause()?;
        state.paused = true;
        Ok(())
    }

    pub fn resume(&self) -> MusicResult<()> {
        let mut state = self.state.lock();
        if !state.is_playing() {
            return Err(MusicError::NothingPlaying);
        }
        self.sink.resume()?;
        state.paused = false;
        Ok(())
    }

    /// Move the bot to another voice channel of the same guild.
    pub async fn move_to(&self, channel_id: ChannelId) -> MusicResult<()> {
        if self.is_disconnected() {
            return Err(MusicError::NotConnected);
        }
        self.voice.move_to(channel_id).await
    }

    pub fn current_track(&self) -> Option<TrackMetadata> {
        self.state.lock().current.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().is_playing()
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn phase(&self) -> PlayerPhase {
        self.state.lock().phase
    }

    pub fn is_disconnected(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().volume
    }

    pub fn is_looping(&self) -> bool {
        self.state.lock().looping
    }

    /// Number of skip votes cast on the current track.
    pub fn skip_votes(&self) -> usize {
        self.state.lock().skip_votes.len()
    }

    pub fn queue(&self) -> &Arc<TrackQueue> {
        &self.queue
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn text_channel(&self) -> ChannelId {
        self.text_channel
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}
