//! Blob Storage on the local file system

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::BlobStore,
};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File-system backed blob store
///
/// Each tier maps to a directory under the store root; each key maps to a
/// file whose name is the URL-safe base64 encoding of the key, so arbitrary
/// resource paths (slashes included) become valid file names. Blobs survive
/// process restarts.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a blob store rooted at `root`. The directory is created lazily
    /// on first write.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create a blob store under the platform cache directory.
    pub fn in_cache_dir(app_name: &str) -> Self {
        let root = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(app_name);
        Self::new(root)
    }

    fn blob_path(&self, tier: &str, key: &str) -> PathBuf {
        self.root.join(tier).join(URL_SAFE_NO_PAD.encode(key))
    }

    fn decode_file_name(path: &Path) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        let bytes = URL_SAFE_NO_PAD.decode(name).ok()?;
        String::from_utf8(bytes).ok()
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn contains(&self, tier: &str, key: &str) -> Result<bool> {
        Ok(fs::try_exists(self.blob_path(tier, key))
            .await
            .map_err(BridgeError::Io)?)
    }

    async fn get(&self, tier: &str, key: &str) -> Result<Option<Bytes>> {
        match fs::read(self.blob_path(tier, key)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BridgeError::Io(e)),
        }
    }

    async fn put(&self, tier: &str, key: &str, data: Bytes) -> Result<()> {
        let path = self.blob_path(tier, key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(BridgeError::Io)?;
        }
        fs::write(&path, &data).await.map_err(BridgeError::Io)?;
        debug!(tier, key, size = data.len(), "Stored blob");
        Ok(())
    }

    async fn remove(&self, tier: &str, key: &str) -> Result<()> {
        match fs::remove_file(self.blob_path(tier, key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BridgeError::Io(e)),
        }
    }

    async fn keys(&self, tier: &str) -> Result<Vec<String>> {
        let dir = self.root.join(tier);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BridgeError::Io(e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(BridgeError::Io)? {
            if let Some(key) = Self::decode_file_name(&entry.path()) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
