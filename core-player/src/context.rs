//! Shared player context.

use bridge_traits::audio::AudioEngine;
use bridge_traits::storage::SettingsStore;
use bridge_traits::time::Clock;
use core_runtime::events::EventBus;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::modes::PlaybackModes;

/// Explicit context object carrying the capabilities and process-wide mode
/// state the player components share. Constructed once at startup and
/// threaded through; there are no ambient globals.
pub struct PlayerContext {
    engine: Arc<dyn AudioEngine>,
    settings: Arc<dyn SettingsStore>,
    events: EventBus,
    clock: Arc<dyn Clock>,
    modes: RwLock<PlaybackModes>,
}

impl PlayerContext {
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        settings: Arc<dyn SettingsStore>,
        events: EventBus,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine,
            settings,
            events,
            clock,
            modes: RwLock::new(PlaybackModes::default()),
        }
    }

    pub fn engine(&self) -> &Arc<dyn AudioEngine> {
        &self.engine
    }

    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.settings
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Snapshot of the current mode set.
    pub async fn modes(&self) -> PlaybackModes {
        *self.modes.read().await
    }

    pub(crate) fn modes_lock(&self) -> &RwLock<PlaybackModes> {
        &self.modes
    }
}
