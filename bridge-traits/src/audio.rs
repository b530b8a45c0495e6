//! Audio engine bridge traits.
//!
//! These abstractions let the core playback module drive a platform audio
//! engine without knowing how decoding or output is implemented. The host
//! provides a concrete [`AudioEngine`]; each accepted play intent yields an
//! owned [`AudioHandle`] whose lifetime is managed exclusively by the
//! session manager.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::oneshot;

use crate::error::Result;

/// Source of audio data handed to the engine.
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Remote HTTP(S) stream fetched by the host engine.
    RemoteStream { url: String },
    /// Pre-fetched audio bytes, typically served out of the preview cache.
    MemoryBuffer { data: Bytes },
}

impl AudioSource {
    /// Returns `true` if this source requires network access to play.
    pub fn is_remote(&self) -> bool {
        matches!(self, AudioSource::RemoteStream { .. })
    }
}

/// An owned decoding/output handle for one in-flight playback.
///
/// Handles are created by [`AudioEngine::load`] in a stopped state at
/// position zero. Dropping a handle releases the underlying engine
/// resources.
#[async_trait]
pub trait AudioHandle: Send + Sync {
    /// Request that playback begin asynchronously.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Rejected`](crate::error::BridgeError::Rejected)
    /// when the engine refuses to start (commonly: the host requires a prior
    /// user interaction gesture). The caller treats this as retryable.
    async fn play(&mut self) -> Result<()>;

    /// Pause playback and reset the position to the start of the stream.
    async fn stop(&mut self) -> Result<()>;

    /// Set the engine-level loop attribute. The flag is consulted at the
    /// next natural end-of-stream check, so toggling it mid-playback takes
    /// effect without restarting the stream.
    async fn set_looping(&mut self, looping: bool) -> Result<()>;

    /// Elapsed play time from the start of the stream, in milliseconds.
    async fn position_ms(&self) -> Result<u64>;

    /// Take the natural end-of-stream signal for this handle.
    ///
    /// The channel fires at most once, when the stream reaches its end while
    /// the loop attribute is off. Looping handles never fire it. Returns
    /// `None` on subsequent calls; the session manager takes the signal once
    /// at session creation.
    fn take_ended_signal(&mut self) -> Option<oneshot::Receiver<()>>;
}

/// Platform audio engine.
///
/// All handles created by one engine are routed through a single shared
/// output-gain stage, so [`AudioEngine::set_master_gain`] affects every
/// currently playing handle immediately and uniformly, and applies to
/// handles created thereafter.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Create a new handle for the given source, stopped at position zero.
    async fn load(&self, source: AudioSource) -> Result<Box<dyn AudioHandle>>;

    /// Set the shared output gain. `1.0` is nominal; values above it
    /// amplify.
    async fn set_master_gain(&self, gain: f32) -> Result<()>;

    /// Current shared output gain.
    async fn master_gain(&self) -> Result<f32>;
}
