//! Storage Abstractions
//!
//! Platform-agnostic traits for tiered byte-blob storage (the backing store
//! of the offline cache) and typed key-value settings persistence.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Named-tier byte-blob storage.
///
/// Each tier is an isolated namespace of (resource key -> blob) pairs. The
/// cache layer addresses tiers by name so that the preview tier and the
/// application-shell tier can never collide on a key. Implementations must
/// keep stored blobs durable across process restarts.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::BlobStore;
///
/// async fn warm(store: &dyn BlobStore, body: bytes::Bytes) -> Result<()> {
///     store.put("preview-v1", "/sound/42/preview", body).await
/// }
/// ```
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Check whether a blob exists under the given tier and key.
    async fn contains(&self, tier: &str, key: &str) -> Result<bool>;

    /// Fetch a blob. Returns `Ok(None)` when the key is absent.
    async fn get(&self, tier: &str, key: &str) -> Result<Option<Bytes>>;

    /// Store a blob, replacing any previous value for the key.
    async fn put(&self, tier: &str, key: &str, data: Bytes) -> Result<()>;

    /// Remove a blob. Removing an absent key is not an error.
    async fn remove(&self, tier: &str, key: &str) -> Result<()>;

    /// List all keys stored under a tier.
    async fn keys(&self, tier: &str) -> Result<Vec<String>>;
}

/// Key-value settings storage trait
///
/// Abstracts platform preference storage. Used for the persisted playback
/// modes, master volume, and the favorites document.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Store a boolean value
    async fn set_bool(&self, key: &str, value: bool) -> Result<()>;

    /// Retrieve a boolean value
    async fn get_bool(&self, key: &str) -> Result<Option<bool>>;

    /// Store an integer value
    async fn set_i64(&self, key: &str, value: i64) -> Result<()>;

    /// Retrieve an integer value
    async fn get_i64(&self, key: &str) -> Result<Option<i64>>;

    /// Delete a setting
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    async fn has_key(&self, key: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapBlobStore {
        inner: Mutex<HashMap<(String, String), Bytes>>,
    }

    #[async_trait]
    impl BlobStore for MapBlobStore {
        async fn contains(&self, tier: &str, key: &str) -> Result<bool> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .contains_key(&(tier.to_string(), key.to_string())))
        }

        async fn get(&self, tier: &str, key: &str) -> Result<Option<Bytes>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .get(&(tier.to_string(), key.to_string()))
                .cloned())
        }

        async fn put(&self, tier: &str, key: &str, data: Bytes) -> Result<()> {
            self.inner
                .lock()
                .unwrap()
                .insert((tier.to_string(), key.to_string()), data);
            Ok(())
        }

        async fn remove(&self, tier: &str, key: &str) -> Result<()> {
            self.inner
                .lock()
                .unwrap()
                .remove(&(tier.to_string(), key.to_string()));
            Ok(())
        }

        async fn keys(&self, tier: &str) -> Result<Vec<String>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .keys()
                .filter(|(t, _)| t == tier)
                .map(|(_, k)| k.clone())
                .collect())
        }
    }

    #[tokio::test]
    async fn tiers_are_isolated_namespaces() {
        let store = MapBlobStore {
            inner: Mutex::new(HashMap::new()),
        };

        store
            .put("preview-v1", "/sound/1/preview", Bytes::from_static(b"a"))
            .await
            .unwrap();

        assert!(store.contains("preview-v1", "/sound/1/preview").await.unwrap());
        assert!(!store.contains("shell-v1", "/sound/1/preview").await.unwrap());
    }
}
