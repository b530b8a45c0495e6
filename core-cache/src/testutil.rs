//! In-memory test doubles shared by the cache unit tests.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::storage::BlobStore;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) struct MemoryBlobStore {
    inner: Mutex<HashMap<(String, String), Bytes>>,
}

impl MemoryBlobStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn contains(&self, tier: &str, key: &str) -> BridgeResult<bool> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .contains_key(&(tier.into(), key.into())))
    }

    async fn get(&self, tier: &str, key: &str) -> BridgeResult<Option<Bytes>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .get(&(tier.into(), key.into()))
            .cloned())
    }

    async fn put(&self, tier: &str, key: &str, data: Bytes) -> BridgeResult<()> {
        self.inner
            .lock()
            .unwrap()
            .insert((tier.into(), key.into()), data);
        Ok(())
    }

    async fn remove(&self, tier: &str, key: &str) -> BridgeResult<()> {
        self.inner.lock().unwrap().remove(&(tier.into(), key.into()));
        Ok(())
    }

    async fn keys(&self, tier: &str) -> BridgeResult<Vec<String>> {
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

/// Scripted HTTP client counting the fetches it serves.
pub(crate) struct ScriptedHttp {
    responses: Mutex<HashMap<String, (u16, Bytes)>>,
    fetches: AtomicUsize,
    offline: Mutex<bool>,
}

impl ScriptedHttp {
    pub(crate) fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
            offline: Mutex::new(false),
        }
    }

    pub(crate) fn offline() -> Self {
        let http = Self::new();
        http.set_offline(true);
        http
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    pub(crate) fn respond(&self, url: &str, status: u16, body: &'static [u8]) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, Bytes::from_static(body)));
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if *self.offline.lock().unwrap() {
            return Err(BridgeError::OperationFailed("connection refused".into()));
        }
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .unwrap_or((404, Bytes::new()));
        Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body,
        })
    }

    async fn download_stream(
        &self,
        _url: String,
    ) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
        Err(BridgeError::NotAvailable("streaming not scripted".into()))
    }
}
