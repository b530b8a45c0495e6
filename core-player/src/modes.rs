//! # Mode/Volume Controller
//!
//! Holds the user-togglable playback modes (overlap, loop, master volume)
//! and keeps them in sync with the settings store. Every setter persists
//! before it returns, so a crash immediately after a toggle never loses the
//! user's choice.
//!
//! The loop flag is captured by each session when it starts and is not
//! retro-applied: a session already looping keeps looping until explicitly
//! stopped, and a non-looping session never starts looping mid-flight.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::context::PlayerContext;
use crate::error::{PlayerError, Result};

/// Settings key for the overlap (chaos) mode flag.
pub const KEY_OVERLAP: &str = "playback.overlap";
/// Settings key for the loop mode flag.
pub const KEY_LOOP: &str = "playback.loop";
/// Settings key for the master volume percentage.
pub const KEY_VOLUME: &str = "playback.volume_percent";

/// Highest accepted master volume, in percent of nominal.
pub const MAX_VOLUME_PERCENT: u16 = 200;
/// Startup default master volume.
pub const DEFAULT_VOLUME_PERCENT: u16 = 100;

/// Process-wide playback mode set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackModes {
    /// Chaos mode: multiple sounds may play at once.
    pub overlap_allowed: bool,
    /// Loop mode applied to newly started sessions.
    pub loop_enabled: bool,
    /// Master volume, 0-200 percent of nominal.
    pub volume_percent: u16,
}

impl Default for PlaybackModes {
    fn default() -> Self {
        Self {
            overlap_allowed: false,
            loop_enabled: false,
            volume_percent: DEFAULT_VOLUME_PERCENT,
        }
    }
}

impl PlaybackModes {
    /// The shared output gain this mode set calls for. Nominal is `1.0`.
    pub fn master_gain(&self) -> f32 {
        f32::from(self.volume_percent) / 100.0
    }
}

/// Controller mutating the mode set. The only writer of the shared
/// master-gain stage.
pub struct ModeController {
    ctx: Arc<PlayerContext>,
}

impl ModeController {
    pub fn new(ctx: Arc<PlayerContext>) -> Self {
        Self { ctx }
    }

    /// Toggle chaos mode. Persisted before the in-memory state changes.
    pub async fn set_overlap_allowed(&self, allowed: bool) -> Result<()> {
        self.ctx
            .settings()
            .set_bool(KEY_OVERLAP, allowed)
            .await
            .map_err(|e| PlayerError::Persistence(e.to_string()))?;
        self.ctx.modes_lock().write().await.overlap_allowed = allowed;
        debug!(allowed, "overlap mode changed");
        Ok(())
    }

    /// Toggle loop mode for sessions started from now on.
    pub async fn set_loop(&self, enabled: bool) -> Result<()> {
        self.ctx
            .settings()
            .set_bool(KEY_LOOP, enabled)
            .await
            .map_err(|e| PlayerError::Persistence(e.to_string()))?;
        self.ctx.modes_lock().write().await.loop_enabled = enabled;
        debug!(enabled, "loop mode changed");
        Ok(())
    }

    /// Set the master volume. The value is clamped to
    /// [0, [`MAX_VOLUME_PERCENT`]], persisted, and applied to the engine's
    /// single shared gain stage, so every current and future session is
    /// affected uniformly.
    pub async fn set_volume(&self, percent: u16) -> Result<()> {
        let clamped = percent.min(MAX_VOLUME_PERCENT);
        self.ctx
            .settings()
            .set_i64(KEY_VOLUME, i64::from(clamped))
            .await
            .map_err(|e| PlayerError::Persistence(e.to_string()))?;

        let gain = {
            let mut modes = self.ctx.modes_lock().write().await;
            modes.volume_percent = clamped;
            modes.master_gain()
        };

        self.ctx
            .engine()
            .set_master_gain(gain)
            .await
            .map_err(|e| PlayerError::Engine(e.to_string()))?;

        debug!(percent = clamped, gain, "master volume changed");
        Ok(())
    }

    /// Hydrate the mode set from the settings store at startup. Corrupt or
    /// missing values fall back to defaults without erroring; the recovered
    /// gain is applied to the engine.
    pub async fn load_persisted(&self) -> Result<()> {
        let defaults = PlaybackModes::default();
        let settings = self.ctx.settings();

        let overlap_allowed = match settings.get_bool(KEY_OVERLAP).await {
            Ok(Some(v)) => v,
            Ok(None) => defaults.overlap_allowed,
            Err(e) => {
                warn!(error = %e, "persisted overlap flag unreadable, using default");
                defaults.overlap_allowed
            }
        };

        let loop_enabled = match settings.get_bool(KEY_LOOP).await {
            Ok(Some(v)) => v,
            Ok(None) => defaults.loop_enabled,
            Err(e) => {
                warn!(error = %e, "persisted loop flag unreadable, using default");
                defaults.loop_enabled
            }
        };

        let volume_percent = match settings.get_i64(KEY_VOLUME).await {
            Ok(Some(v)) if (0..=i64::from(MAX_VOLUME_PERCENT)).contains(&v) => v as u16,
            Ok(Some(v)) => {
                warn!(value = v, "persisted volume out of range, using default");
                defaults.volume_percent
            }
            Ok(None) => defaults.volume_percent,
            Err(e) => {
                warn!(error = %e, "persisted volume unreadable, using default");
                defaults.volume_percent
            }
        };

        let modes = PlaybackModes {
            overlap_allowed,
            loop_enabled,
            volume_percent,
        };
        *self.ctx.modes_lock().write().await = modes;

        self.ctx
            .engine()
            .set_master_gain(modes.master_gain())
            .await
            .map_err(|e| PlayerError::Engine(e.to_string()))?;

        debug!(?modes, "playback modes hydrated");
        Ok(())
    }
}
