//! Process-wide registry of playback controllers, one per guild.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::join_all;
use serenity::model::id::GuildId;
use std::sync::Arc;
use tracing::{debug, info};

use super::controller::{ControllerParts, PlaybackController};
use crate::config::PlayerConfig;

type ControllerMap = DashMap<GuildId, Arc<PlaybackController>>;

/// Maps each guild to its playback controller.
///
/// Controllers are created lazily and removed when the guild leaves voice,
/// either explicitly or because the controller went idle.
pub struct MusicManager {
    controllers: Arc<ControllerMap>,
    config: PlayerConfig,
}

impl Default for MusicManager {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl MusicManager {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            controllers: Arc::new(DashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Get the live controller for this guild, if there is one
    pub fn get(&self, guild_id: GuildId) -> Option<Arc<PlaybackController>> {
        self.controllers
            .get(&guild_id)
            .map(|entry| Arc::clone(entry.value()))
            .filter(|controller| !controller.is_disconnected())
    }

    /// Get the controller for this guild, creating it with `make_parts` if
    /// there is none (or only a disconnected one). Creation is atomic per guild:
    /// concurrent callers all receive the same controller.
    pub fn get_or_create<F>(&self, guild_id: GuildId, make_parts: F) -> Arc<PlaybackController>
    where
        F: FnOnce() -> ControllerParts,
    {
        match self.controllers.entry(guild_id) {
            Entry::Occupied(entry) if !entry.get().is_disconnected() => Arc::clone(entry.get()),
            Entry::Occupied(mut entry) => {
                debug!("Replacing disconnected controller for guild {}", guild_id);
                let controller = self.spawn(guild_id, make_parts());
                entry.insert(Arc::clone(&controller));
                controller
            }
            Entry::Vacant(entry) => {
                let controller = self.spawn(guild_id, make_parts());
                entry.insert(Arc::clone(&controller));
                controller
            }
        }
    }

    fn spawn(&self, guild_id: GuildId, parts: ControllerParts) -> Arc<PlaybackController> {
        let controllers = Arc::downgrade(&self.controllers);
        PlaybackController::spawn_with_hook(
            guild_id,
            parts,
            self.config.clone(),
            Box::new(move |guild_id, id| {
                if let Some(controllers) = controllers.upgrade() {
                    // Only forget the controller that disconnected, not a newer one.
                    if controllers
                        .remove_if(&guild_id, |_, controller| controller.id() == id)
                        .is_some()
                    {
                        debug!("Removed idle controller for guild {}", guild_id);
                    }
                }
            }),
        )
    }

    /// Wait until a disconnected controller of this guild, if any, has
    /// released voice. Call before joining voice for a new controller, so the
    /// old teardown cannot drop the new call.
    pub async fn settle(&self, guild_id: GuildId) {
        let stale = self
            .controllers
            .get(&guild_id)
            .map(|entry| Arc::clone(entry.value()))
            .filter(|controller| controller.is_disconnected());

        if let Some(controller) = stale {
            debug!("Waiting for the old controller of guild {} to release voice", guild_id);
            controller.wait_released().await;
        }
    }

    /// Stop and forget the controller for this guild. Returns whether one existed.
    ///
    /// The entry stays visible until voice is released, so [`settle`](Self::settle)
    /// can wait on it.
    pub async fn remove(&self, guild_id: GuildId) -> bool {
        let controller = self
            .controllers
            .get(&guild_id)
            .map(|entry| Arc::clone(entry.value()));

        match controller {
            Some(controller) => {
                controller.stop().await;
                self.controllers
                    .remove_if(&guild_id, |_, current| current.id() == controller.id());
                info!("Removed playback controller for guild {}", guild_id);
                true
            }
            None => false,
        }
    }

    /// Stop every controller, e.g. on shutdown.
    pub async fn shutdown(&self) {
        let guild_ids: Vec<GuildId> = self.controllers.iter().map(|entry| *entry.key()).collect();
        info!("Stopping {} playback controllers", guild_ids.len());
        join_all(guild_ids.into_iter().map(|guild_id| self.remove(guild_id))).await;
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
