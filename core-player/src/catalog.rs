//! Sound catalog and preview stream collaborator seams.
//!
//! The catalog service and the preview byte-stream provider live outside
//! this subsystem; these traits are the boundary the player core talks
//! through. Implementations are host concerns (an HTTP proxy client, a test
//! double).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A sound as described by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sound {
    pub id: String,
    pub name: String,
    pub username: String,
    pub duration_secs: u32,
    pub preview_url: String,
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoundPage {
    pub results: Vec<Sound>,
    pub count: usize,
    pub total_pages: usize,
}

/// Remote sound catalog: search, browse, fetch-by-id.
#[async_trait]
pub trait SoundCatalog: Send + Sync {
    /// Full-text search over the catalog.
    async fn search(&self, query: &str, page: usize) -> Result<SoundPage>;

    /// Browse the catalog without a query.
    async fn list(&self, page: usize) -> Result<SoundPage>;

    /// Fetch one sound's metadata.
    async fn get_by_id(&self, id: &str) -> Result<Sound>;
}

/// A range-capable preview byte stream.
pub struct StreamResponse {
    /// 200 for full bodies, 206 for partial content.
    pub status: u16,
    pub content_type: String,
    pub content_length: Option<u64>,
    pub content_range: Option<String>,
    pub body: Box<dyn tokio::io::AsyncRead + Send + Unpin>,
}

/// Provider of preview audio byte streams.
#[async_trait]
pub trait PreviewStreamProvider: Send + Sync {
    /// Open a stream for a sound's preview. `range` is an HTTP `Range`
    /// header value; when present the provider answers with partial
    /// content.
    async fn stream(&self, sound_id: &str, range: Option<&str>) -> Result<StreamResponse>;
}
