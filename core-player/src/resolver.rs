//! Audio source resolution.

use async_trait::async_trait;
use bridge_traits::audio::AudioSource;
use core_cache::{preview_path, FetchRouter};
use std::sync::Arc;
use tracing::debug;

use crate::error::{PlayerError, Result};

/// Turns a sound id into a playable [`AudioSource`].
///
/// The session manager is source-agnostic; production wiring routes preview
/// paths through the cache router, tests inject a canned resolver.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    async fn resolve(&self, sound_id: &str) -> Result<AudioSource>;
}

/// Resolver backed by the offline cache router. Previews already cached are
/// served as memory buffers without touching the network.
pub struct CachedPreviewResolver {
    router: Arc<FetchRouter>,
    origin: String,
}

impl CachedPreviewResolver {
    pub fn new(router: Arc<FetchRouter>, origin: impl Into<String>) -> Self {
        Self {
            router,
            origin: origin.into(),
        }
    }
}

#[async_trait]
impl SourceResolver for CachedPreviewResolver {
    async fn resolve(&self, sound_id: &str) -> Result<AudioSource> {
        let url = format!("{}{}", self.origin, preview_path(sound_id));
        let response = self
            .router
            .handle(&url)
            .await
            .map_err(|e| PlayerError::SourceUnavailable(e.to_string()))?;

        if !response.is_success() {
            return Err(PlayerError::SourceUnavailable(format!(
                "preview for sound {} answered status {}",
                sound_id, response.status
            )));
        }

        debug!(sound_id, served_from = ?response.served_from, "preview resolved");
        Ok(AudioSource::MemoryBuffer {
            data: response.body,
        })
    }
}
