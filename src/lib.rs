//! Workspace facade crate.
//!
//! Re-exports the public surface of the individual workspace crates so host
//! applications can depend on `soundbox` alone and wire up the playback
//! session manager, mode controller, and tiered offline cache without naming
//! each member crate.

pub use bridge_traits;
pub use core_cache;
pub use core_player;
pub use core_runtime;

#[cfg(feature = "desktop")]
pub use bridge_desktop;

pub use core_cache::{CacheTier, FetchOutcome, FetchRouter, TierStore};
pub use core_player::{
    FavoritesStore, ModeController, PlayerContext, SessionManager, Sound,
};
pub use core_runtime::events::{CacheEvent, CoreEvent, EventBus, PlaybackEvent};
