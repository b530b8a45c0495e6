//! # Playback Session Manager
//!
//! State machine over zero-to-many in-flight playback sessions, one per
//! sound id. All transitions run to completion under a single session lock,
//! so the overlap policy check at the start of `play` is atomic with respect
//! to concurrent `play`/`stop` calls: under non-overlap mode no observer can
//! ever see two Playing sessions.
//!
//! Natural end-of-stream is reported by the engine through the handle's
//! ended signal; a watcher task forwards it to [`SessionManager`] together
//! with the session's generation number, so a signal from a torn-down
//! predecessor can never remove the session that replaced it.

use bridge_traits::audio::AudioHandle;
use bridge_traits::error::BridgeError;
use chrono::{DateTime, Utc};
use core_runtime::events::{CoreEvent, PlaybackEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::context::PlayerContext;
use crate::error::{PlayerError, Result};
use crate::resolver::SourceResolver;

/// One in-flight playback of a sound. Owned exclusively by the
/// [`SessionManager`].
pub struct AudioSession {
    pub sound_id: String,
    handle: Box<dyn AudioHandle>,
    /// Captured from the global loop mode when the session started.
    pub loop_enabled: bool,
    pub started_at: DateTime<Utc>,
    generation: u64,
}

/// Manager of all live playback sessions.
pub struct SessionManager {
    ctx: Arc<PlayerContext>,
    resolver: Arc<dyn SourceResolver>,
    sessions: Mutex<HashMap<String, AudioSession>>,
    next_generation: AtomicU64,
    // Handed to watcher tasks so they can report end-of-stream without
    // keeping the manager alive.
    self_ref: Weak<Self>,
}

impl SessionManager {
    pub fn new(ctx: Arc<PlayerContext>, resolver: Arc<dyn SourceResolver>) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            ctx,
            resolver,
            sessions: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
            self_ref: weak.clone(),
        })
    }

    /// Accept a play intent for `sound_id`.
    ///
    /// Under non-overlap mode every other session is stopped first. A second
    /// play for an id already Playing tears the old session down before the
    /// new one starts, so a restart always begins from position zero. An
    /// engine start refusal tears the fresh session down and reports
    /// [`PlayerError::PlaybackBlocked`], which is retryable.
    pub async fn play(&self, sound_id: &str) -> Result<()> {
        let source = self.resolver.resolve(sound_id).await?;

        let mut sessions = self.sessions.lock().await;
        let modes = self.ctx.modes().await;

        if !modes.overlap_allowed {
            self.stop_sessions(&mut sessions).await;
        }

        if let Some(mut existing) = sessions.remove(sound_id) {
            if let Err(e) = existing.handle.stop().await {
                warn!(sound_id, error = %e, "teardown of replaced session failed");
            }
        }

        let mut handle = self
            .ctx
            .engine()
            .load(source)
            .await
            .map_err(|e| PlayerError::Engine(e.to_string()))?;

        if modes.loop_enabled {
            handle
                .set_looping(true)
                .await
                .map_err(|e| PlayerError::Engine(e.to_string()))?;
        }

        let ended = handle.take_ended_signal();

        if let Err(e) = handle.play().await {
            return match e {
                BridgeError::Rejected(reason) => {
                    debug!(sound_id, reason = %reason, "engine refused to start");
                    self.emit(PlaybackEvent::Blocked {
                        sound_id: sound_id.to_string(),
                    });
                    Err(PlayerError::PlaybackBlocked {
                        sound_id: sound_id.to_string(),
                    })
                }
                other => Err(PlayerError::Engine(other.to_string())),
            };
        }

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        sessions.insert(
            sound_id.to_string(),
            AudioSession {
                sound_id: sound_id.to_string(),
                handle,
                loop_enabled: modes.loop_enabled,
                started_at: self.ctx.clock().now(),
                generation,
            },
        );
        drop(sessions);

        if let Some(ended) = ended {
            let manager = self.self_ref.clone();
            let id = sound_id.to_string();
            tokio::spawn(async move {
                // A dropped sender means the handle was torn down first.
                if ended.await.is_ok() {
                    if let Some(manager) = manager.upgrade() {
                        manager.handle_stream_ended(&id, generation).await;
                    }
                }
            });
        }

        self.emit(PlaybackEvent::Started {
            sound_id: sound_id.to_string(),
        });
        Ok(())
    }

    /// Stop one session. Stopping an id that is not Playing is a no-op.
    pub async fn stop(&self, sound_id: &str) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        let Some(mut session) = sessions.remove(sound_id) else {
            return Ok(());
        };
        if let Err(e) = session.handle.stop().await {
            warn!(sound_id, error = %e, "engine stop failed");
        }
        drop(sessions);

        self.emit(PlaybackEvent::Stopped {
            sound_id: sound_id.to_string(),
        });
        Ok(())
    }

    /// Stop every live session. A no-op with zero sessions.
    pub async fn stop_all(&self) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        let count = self.stop_sessions(&mut sessions).await;
        drop(sessions);

        if count > 0 {
            self.emit(PlaybackEvent::StoppedAll { count });
        }
        Ok(())
    }

    pub async fn is_playing(&self, sound_id: &str) -> bool {
        self.sessions.lock().await.contains_key(sound_id)
    }

    pub async fn playing_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Elapsed play position of a live session, if any.
    pub async fn position_ms(&self, sound_id: &str) -> Result<Option<u64>> {
        let sessions = self.sessions.lock().await;
        match sessions.get(sound_id) {
            Some(session) => session
                .handle
                .position_ms()
                .await
                .map(Some)
                .map_err(|e| PlayerError::Engine(e.to_string())),
            None => Ok(None),
        }
    }

    /// React to a natural end-of-stream report. Stale generations (the
    /// session was restarted or replaced since the signal was armed) are
    /// ignored, as are looping sessions.
    pub(crate) async fn handle_stream_ended(&self, sound_id: &str, generation: u64) {
        let mut sessions = self.sessions.lock().await;
        let ends_current = sessions
            .get(sound_id)
            .is_some_and(|s| s.generation == generation && !s.loop_enabled);
        if !ends_current {
            debug!(sound_id, generation, "ignoring stale end-of-stream signal");
            return;
        }
        sessions.remove(sound_id);
        drop(sessions);

        debug!(sound_id, "session completed naturally");
        self.emit(PlaybackEvent::Completed {
            sound_id: sound_id.to_string(),
        });
    }

    /// Stop and remove every session in `sessions`, emitting one Stopped
    /// event each. Caller holds the session lock.
    async fn stop_sessions(&self, sessions: &mut HashMap<String, AudioSession>) -> usize {
        let mut count = 0;
        for (_, mut session) in sessions.drain() {
            if let Err(e) = session.handle.stop().await {
                warn!(sound_id = %session.sound_id, error = %e, "engine stop failed");
            }
            self.emit(PlaybackEvent::Stopped {
                sound_id: session.sound_id.clone(),
            });
            count += 1;
        }
        count
    }

    fn emit(&self, event: PlaybackEvent) {
        let _ = self.ctx.events().emit(CoreEvent::Playback(event));
    }
}
