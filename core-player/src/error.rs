//! # Player Error Types

use thiserror::Error;

/// Errors that can occur in the playback layer.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// The engine refused to begin playback, typically because the host
    /// requires a prior user interaction gesture. Retryable, never fatal.
    #[error("Playback blocked for sound {sound_id}")]
    PlaybackBlocked { sound_id: String },

    /// Neither the cache nor the network could produce the audio source.
    #[error("Audio source unavailable: {0}")]
    SourceUnavailable(String),

    /// The audio engine failed while loading or driving a stream.
    #[error("Audio engine error: {0}")]
    Engine(String),

    /// Settings persistence failed during a mutation.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl PlayerError {
    /// Returns `true` when retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlayerError::PlaybackBlocked { .. })
    }
}

/// Result type for player operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
