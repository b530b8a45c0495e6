//! # Favorites Store
//!
//! In-memory favorites collection backed by a single JSON document in the
//! settings store. Every mutation persists the document before returning,
//! while the store's write lock is held, so the in-memory map and the
//! persisted copy are consistent the moment a mutating call completes.

use bridge_traits::storage::SettingsStore;
use bridge_traits::time::Clock;
use chrono::{DateTime, Utc};
use core_runtime::events::{CoreEvent, EventBus, FavoritesEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::catalog::Sound;
use crate::error::{PlayerError, Result};

/// Settings key of the persisted favorites document.
pub const KEY_FAVORITES: &str = "favorites.v1";

/// One favorited sound.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteEntry {
    pub id: String,
    pub name: String,
    pub username: String,
    pub duration_secs: u32,
    pub favorited_at: DateTime<Utc>,
}

impl FavoriteEntry {
    /// Build an entry from catalog metadata, stamped with the injected
    /// clock.
    pub fn from_sound(sound: &Sound, clock: &dyn Clock) -> Self {
        Self {
            id: sound.id.clone(),
            name: sound.name.clone(),
            username: sound.username.clone(),
            duration_secs: sound.duration_secs,
            favorited_at: clock.now(),
        }
    }
}

/// Favorites collection keyed by sound id.
pub struct FavoritesStore {
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    events: Option<EventBus>,
    entries: RwLock<HashMap<String, FavoriteEntry>>,
}

impl FavoritesStore {
    pub fn new(settings: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings,
            clock,
            events: None,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Attach an event bus for favorites notifications.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Hydrate the collection from the persisted document. A missing or
    /// corrupt document yields an empty collection, never an error.
    pub async fn load(&self) -> Result<()> {
        let raw = match self.settings.get_string(KEY_FAVORITES).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(()),
            Err(e) => {
                warn!(error = %e, "favorites document unreadable, starting empty");
                return Ok(());
            }
        };

        match serde_json::from_str::<Vec<FavoriteEntry>>(&raw) {
            Ok(list) => {
                let mut entries = self.entries.write().await;
                entries.clear();
                for entry in list {
                    entries.insert(entry.id.clone(), entry);
                }
                debug!(count = entries.len(), "favorites hydrated");
            }
            Err(e) => {
                warn!(error = %e, "favorites document corrupt, starting empty");
            }
        }
        Ok(())
    }

    /// Add an entry. Persists before returning; replacing an existing entry
    /// for the same id refreshes its metadata and timestamp.
    pub async fn add(&self, entry: FavoriteEntry) -> Result<()> {
        let sound_id = entry.id.clone();
        {
            let mut entries = self.entries.write().await;
            let previous = entries.insert(sound_id.clone(), entry);
            if let Err(e) = self.persist(&entries).await {
                // Roll the map back so memory and disk stay consistent.
                match previous {
                    Some(p) => entries.insert(sound_id, p),
                    None => entries.remove(&sound_id),
                };
                return Err(e);
            }
        }
        self.emit(FavoritesEvent::Added { sound_id });
        Ok(())
    }

    /// Favorite a sound straight from its catalog metadata.
    pub async fn add_sound(&self, sound: &Sound) -> Result<()> {
        self.add(FavoriteEntry::from_sound(sound, self.clock.as_ref()))
            .await
    }

    /// Remove an entry. Removing an absent id is a no-op.
    pub async fn remove(&self, sound_id: &str) -> Result<()> {
        {
            let mut entries = self.entries.write().await;
            let Some(previous) = entries.remove(sound_id) else {
                return Ok(());
            };
            if let Err(e) = self.persist(&entries).await {
                entries.insert(sound_id.to_string(), previous);
                return Err(e);
            }
        }
        self.emit(FavoritesEvent::Removed {
            sound_id: sound_id.to_string(),
        });
        Ok(())
    }

    pub async fn is_favorite(&self, sound_id: &str) -> bool {
        self.entries.read().await.contains_key(sound_id)
    }

    /// All entries, oldest favorite first.
    pub async fn list(&self) -> Vec<FavoriteEntry> {
        let mut list: Vec<_> = self.entries.read().await.values().cloned().collect();
        list.sort_by(|a, b| a.favorited_at.cmp(&b.favorited_at));
        list
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn persist(&self, entries: &HashMap<String, FavoriteEntry>) -> Result<()> {
        let mut list: Vec<_> = entries.values().collect();
        list.sort_by(|a, b| a.favorited_at.cmp(&b.favorited_at));
        let json = serde_json::to_string(&list)
            .map_err(|e| PlayerError::Persistence(e.to_string()))?;
        self.settings
            .set_string(KEY_FAVORITES, &json)
            .await
            .map_err(|e| PlayerError::Persistence(e.to_string()))
    }

    fn emit(&self, event: FavoritesEvent) {
        if let Some(events) = &self.events {
            let _ = events.emit(CoreEvent::Favorites(event));
        }
    }
}
