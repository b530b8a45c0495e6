//! Cache tiers and resource path conventions.

use std::fmt;

/// Path prefix of preview/media resources.
pub const PREVIEW_PREFIX: &str = "/sound/";
/// Path suffix of preview/media resources.
pub const PREVIEW_SUFFIX: &str = "/preview";

/// The two partitions of the offline cache, each with its own population
/// strategy. Typed rather than stringly-named so keys can never collide
/// across tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTier {
    /// Explicit, user-triggered, permanent-intent preview audio. Entries are
    /// terminal: once cached, never evicted or re-fetched by this subsystem.
    Preview,
    /// Implicit application-shell assets, refreshed with
    /// stale-while-revalidate.
    AppShell,
}

impl CacheTier {
    /// Stable storage namespace for the tier. Versioned so a future layout
    /// change can roll over without colliding with old entries.
    pub fn name(&self) -> &'static str {
        match self {
            CacheTier::Preview => "preview-v1",
            CacheTier::AppShell => "shell-v1",
        }
    }
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource path for a sound's streaming preview.
pub fn preview_path(sound_id: &str) -> String {
    format!("{}{}{}", PREVIEW_PREFIX, sound_id, PREVIEW_SUFFIX)
}

/// Whether a path addresses a preview/media resource. Matches on the
/// prefix/suffix pattern only, not the full catalog surface.
pub fn is_preview_path(path: &str) -> bool {
    path.starts_with(PREVIEW_PREFIX)
        && path.ends_with(PREVIEW_SUFFIX)
        && path.len() > PREVIEW_PREFIX.len() + PREVIEW_SUFFIX.len()
}
