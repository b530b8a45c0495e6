//! # Cache Tier Store
//!
//! Key-value byte-blob store partitioned into typed tiers, with fail-soft
//! existence checks, idempotent fetch-and-store population, and pure lookup.
//!
//! The store persists through the host's [`BlobStore`] capability; when that
//! capability is absent the store degrades rather than failing: `exists`
//! answers `false`, `retrieve` answers `None`, and population reports
//! [`CacheError::StorageUnavailable`] so callers can fall back to plain
//! network fetches.

use bridge_traits::http::{HttpClient, HttpRequest};
use bridge_traits::storage::BlobStore;
use bytes::Bytes;
use core_runtime::events::{CacheEvent, CoreEvent, EventBus};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::tier::CacheTier;

/// Result of a fetch-and-store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The key was already resolved as stored; no network access occurred.
    AlreadyPresent,
    /// The resource was fetched from the network and stored.
    Stored,
}

/// Tiered blob store fronting the offline cache.
pub struct TierStore {
    blobs: Option<Arc<dyn BlobStore>>,
    http: Arc<dyn HttpClient>,
    origin: String,
    events: Option<EventBus>,
}

impl TierStore {
    /// Create a new tier store.
    ///
    /// `blobs` is `None` when the runtime offers no durable storage; every
    /// operation then fails soft as documented on the methods. `origin` is
    /// the base URL resource keys are resolved against.
    pub fn new(
        blobs: Option<Arc<dyn BlobStore>>,
        http: Arc<dyn HttpClient>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            blobs,
            http,
            origin: origin.into(),
            events: None,
        }
    }

    /// Attach an event bus for cache notifications.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Whether the runtime offers durable blob storage at all.
    pub fn storage_available(&self) -> bool {
        self.blobs.is_some()
    }

    /// Check whether a resource is cached. Fails soft: storage absence or a
    /// storage error both answer `false`.
    pub async fn exists(&self, tier: CacheTier, key: &str) -> bool {
        let Some(blobs) = &self.blobs else {
            return false;
        };
        match blobs.contains(tier.name(), key).await {
            Ok(present) => present,
            Err(e) => {
                warn!(tier = %tier, key, error = %e, "existence check failed");
                false
            }
        }
    }

    /// Populate the tier with the resource at `key`, fetching it from the
    /// network unless it is already present.
    ///
    /// Idempotent: a second call after a successful `Stored` answers
    /// `AlreadyPresent` without touching the network. A non-success response
    /// status is reported as [`CacheError::FetchFailed`] and leaves the
    /// store unmodified.
    pub async fn fetch_and_store(&self, tier: CacheTier, key: &str) -> Result<FetchOutcome> {
        if self.blobs.is_none() {
            return Err(CacheError::StorageUnavailable);
        }

        if self.exists(tier, key).await {
            debug!(tier = %tier, key, "already cached, skipping fetch");
            return Ok(FetchOutcome::AlreadyPresent);
        }

        let url = format!("{}{}", self.origin, key);
        let response = self
            .http
            .execute(HttpRequest::get(url))
            .await
            .map_err(|e| CacheError::Network(e.to_string()))?;

        if !response.is_success() {
            return Err(CacheError::FetchFailed {
                status: response.status,
            });
        }

        self.store(tier, key, response.body).await?;

        if tier == CacheTier::Preview {
            self.emit(CacheEvent::PreviewStored {
                key: key.to_string(),
            });
        }

        Ok(FetchOutcome::Stored)
    }

    /// Pure lookup, no network access. Answers `None` when the key is
    /// absent, storage is unavailable, or the stored copy fails its
    /// integrity check (the stale entry is dropped).
    pub async fn retrieve(&self, tier: CacheTier, key: &str) -> Result<Option<Bytes>> {
        let Some(blobs) = &self.blobs else {
            return Ok(None);
        };

        let data = match blobs.get(tier.name(), key).await {
            Ok(Some(data)) => data,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(tier = %tier, key, error = %e, "retrieve failed");
                return Ok(None);
            }
        };

        match blobs.get(tier.name(), &hash_key(key)).await {
            Ok(Some(expected)) if expected != content_hash(&data) => {
                warn!(tier = %tier, key, "integrity check failed, dropping entry");
                let _ = blobs.remove(tier.name(), key).await;
                let _ = blobs.remove(tier.name(), &hash_key(key)).await;
                Ok(None)
            }
            _ => Ok(Some(data)),
        }
    }

    /// Store a byte-for-byte copy under `key`, together with its content
    /// hash side-entry.
    pub async fn store(&self, tier: CacheTier, key: &str, data: Bytes) -> Result<()> {
        let Some(blobs) = &self.blobs else {
            return Err(CacheError::StorageUnavailable);
        };

        let hash = content_hash(&data);
        blobs.put(tier.name(), key, data).await.map_err(|e| {
            warn!(tier = %tier, key, error = %e, "store failed");
            CacheError::StorageUnavailable
        })?;
        blobs
            .put(tier.name(), &hash_key(key), hash)
            .await
            .map_err(|e| {
                warn!(tier = %tier, key, error = %e, "hash store failed");
                CacheError::StorageUnavailable
            })?;

        debug!(tier = %tier, key, "stored cache entry");
        Ok(())
    }

    fn emit(&self, event: CacheEvent) {
        if let Some(events) = &self.events {
            let _ = events.emit(CoreEvent::Cache(event));
        }
    }
}

fn hash_key(key: &str) -> String {
    format!("{}#sha256", key)
}

fn content_hash(data: &[u8]) -> Bytes {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Bytes::from(hex::encode(hasher.finalize()))
}
