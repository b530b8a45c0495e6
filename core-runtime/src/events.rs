//! # Event Bus System
//!
//! Event-driven notification channel built on `tokio::sync::broadcast`. The
//! playback session manager, mode controller, cache router, and favorites
//! store publish typed events here; UI layers subscribe instead of hooking
//! engine callbacks directly.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, CoreEvent, PlaybackEvent};
//!
//! let bus = EventBus::new(100);
//! let mut sub = bus.subscribe();
//!
//! bus.emit(CoreEvent::Playback(PlaybackEvent::Started {
//!     sound_id: "42".to_string(),
//! }))
//! .ok();
//! ```
//!
//! ## Error Handling
//!
//! Subscribers that fall behind receive `RecvError::Lagged(n)` and can keep
//! reading; `RecvError::Closed` signals shutdown. Emitting with zero
//! subscribers returns an error and is safe to ignore.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Playback session lifecycle events
    Playback(PlaybackEvent),
    /// Offline cache events
    Cache(CacheEvent),
    /// Favorites collection events
    Favorites(FavoritesEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Cache(e) => e.description(),
            CoreEvent::Favorites(e) => e.description(),
        }
    }
}

/// Events emitted by the playback session manager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A session transitioned to Playing.
    Started { sound_id: String },
    /// A session was explicitly stopped.
    Stopped { sound_id: String },
    /// Every live session was stopped at once.
    StoppedAll { count: usize },
    /// A non-looping session reached its natural end of stream.
    Completed { sound_id: String },
    /// The engine refused to start playback; the intent is retryable.
    Blocked { sound_id: String },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Started { .. } => "Playback started",
            PlaybackEvent::Stopped { .. } => "Playback stopped",
            PlaybackEvent::StoppedAll { .. } => "All playback stopped",
            PlaybackEvent::Completed { .. } => "Playback completed",
            PlaybackEvent::Blocked { .. } => "Playback blocked",
        }
    }
}

/// Events emitted by the cache tier store and strategy router.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CacheEvent {
    /// A preview resource was fetched and stored in the preview tier.
    PreviewStored { key: String },
    /// A shell resource was refreshed in the background.
    ShellRefreshed { path: String },
    /// Neither cache nor network could satisfy a request; a synthetic
    /// unavailable response was served.
    ServedSynthetic { key: String },
}

impl CacheEvent {
    fn description(&self) -> &str {
        match self {
            CacheEvent::PreviewStored { .. } => "Preview cached",
            CacheEvent::ShellRefreshed { .. } => "Shell resource refreshed",
            CacheEvent::ServedSynthetic { .. } => "Served synthetic response",
        }
    }
}

/// Events emitted by the favorites store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum FavoritesEvent {
    Added { sound_id: String },
    Removed { sound_id: String },
}

impl FavoritesEvent {
    fn description(&self) -> &str {
        match self {
            FavoritesEvent::Added { .. } => "Favorite added",
            FavoritesEvent::Removed { .. } => "Favorite removed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally: multiple producers (clone the
/// bus), multiple independent consumers, non-blocking sends, and lagging
/// detection for slow subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error when there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with predicate filtering, so a
/// subscriber interested in one event family can ignore the rest.
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter; only matching events are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            let Some(filter) = &self.filter else {
                return Ok(event);
            };
            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking. Returns `None` when no
    /// matching event is currently buffered.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };
                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_subscription_count() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn emission_without_subscribers_errors() {
        let bus = EventBus::new(10);
        let event = CoreEvent::Playback(PlaybackEvent::Stopped {
            sound_id: "1".to_string(),
        });
        assert!(bus.emit(event).is_err());
    }

    #[tokio::test]
    async fn all_subscribers_receive_the_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = CoreEvent::Cache(CacheEvent::PreviewStored {
            key: "/sound/42/preview".to_string(),
        });
        bus.emit(event.clone()).ok();

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn stream_filter_skips_other_families() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Playback(_)));

        bus.emit(CoreEvent::Cache(CacheEvent::ShellRefreshed {
            path: "/app.js".to_string(),
        }))
        .ok();

        let playback = CoreEvent::Playback(PlaybackEvent::Completed {
            sound_id: "9".to_string(),
        });
        bus.emit(playback.clone()).ok();

        assert_eq!(stream.recv().await.unwrap(), playback);
    }

    #[tokio::test]
    async fn lagged_subscriber_is_reported() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(CoreEvent::Playback(PlaybackEvent::Started {
                sound_id: format!("{}", i),
            }))
            .ok();
        }

        assert!(matches!(sub.recv().await, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn event_serialization_round_trip() {
        let event = CoreEvent::Playback(PlaybackEvent::Blocked {
            sound_id: "42".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Blocked"));
        let back: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn event_descriptions() {
        let event = CoreEvent::Favorites(FavoritesEvent::Added {
            sound_id: "42".to_string(),
        });
        assert_eq!(event.description(), "Favorite added");
    }
}
