//! # Fetch Router
//!
//! Routes outgoing resource requests through the offline cache, choosing a
//! strategy by resource class:
//!
//! - Preview media is served cache-first. A cached copy short-circuits the
//!   network entirely; a miss goes to the network and the body is stored for
//!   next time.
//! - Application-shell assets are served stale-while-revalidate. A cached
//!   copy is answered immediately while a background task refreshes it.
//! - Everything else passes through to the network untouched.
//!
//! When the device is offline and no cached copy exists, the router answers
//! a synthetic `503` response instead of surfacing a transport error, so the
//! caller sees ordinary HTTP semantics in every case.

use bridge_traits::http::{HttpClient, HttpRequest};
use bytes::Bytes;
use core_runtime::events::{CacheEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::store::TierStore;
use crate::tier::{is_preview_path, CacheTier};

/// Status of the synthetic response served when the device is offline and
/// the cache holds no copy of the requested resource.
pub const STATUS_OFFLINE_NO_CACHE: u16 = 503;

/// Routing class of a requested resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// Streaming preview audio, cached permanently on first fetch.
    PreviewMedia,
    /// Application-shell asset on the configured allow-list.
    AppShell,
    /// Anything else, including cross-origin requests.
    PassThrough,
}

/// Where a routed response was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    PreviewCache,
    ShellCache,
    Network,
    /// Fabricated by the router because neither network nor cache could
    /// answer.
    Synthetic,
}

/// A response produced by the router.
#[derive(Debug, Clone)]
pub struct RouterResponse {
    pub status: u16,
    pub body: Bytes,
    pub served_from: ServedFrom,
}

impl RouterResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn synthetic() -> Self {
        Self {
            status: STATUS_OFFLINE_NO_CACHE,
            body: Bytes::new(),
            served_from: ServedFrom::Synthetic,
        }
    }
}

/// Strategy-routing interceptor in front of the network.
pub struct FetchRouter {
    store: Arc<TierStore>,
    http: Arc<dyn HttpClient>,
    origin: String,
    shell_paths: Vec<String>,
    events: Option<EventBus>,
}

impl FetchRouter {
    /// Create a router for the given origin. `shell_paths` is the allow-list
    /// of same-origin paths treated as application-shell assets.
    pub fn new(
        store: Arc<TierStore>,
        http: Arc<dyn HttpClient>,
        origin: impl Into<String>,
        shell_paths: Vec<String>,
    ) -> Self {
        Self {
            store,
            http,
            origin: origin.into(),
            shell_paths,
            events: None,
        }
    }

    /// Attach an event bus for cache notifications.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Classify a request URL. Cross-origin URLs are always pass-through;
    /// same-origin URLs are classified by path.
    pub fn classify(&self, url: &str) -> ResourceClass {
        let Some(path) = self.same_origin_path(url) else {
            return ResourceClass::PassThrough;
        };
        if is_preview_path(path) {
            ResourceClass::PreviewMedia
        } else if self.shell_paths.iter().any(|p| p.as_str() == path) {
            ResourceClass::AppShell
        } else {
            ResourceClass::PassThrough
        }
    }

    /// Route a request through the strategy for its resource class.
    pub async fn handle(&self, url: &str) -> Result<RouterResponse> {
        match self.classify(url) {
            ResourceClass::PreviewMedia => self.cache_first(url).await,
            ResourceClass::AppShell => self.stale_while_revalidate(url).await,
            ResourceClass::PassThrough => self.pass_through(url).await,
        }
    }

    async fn cache_first(&self, url: &str) -> Result<RouterResponse> {
        let key = self.cache_key(url)?;

        if let Some(body) = self.store.retrieve(CacheTier::Preview, &key).await? {
            debug!(key = %key, "preview served from cache");
            return Ok(RouterResponse {
                status: 200,
                body,
                served_from: ServedFrom::PreviewCache,
            });
        }

        match self.http.execute(HttpRequest::get(url)).await {
            Ok(response) => {
                if response.is_success() {
                    self.store_fail_soft(CacheTier::Preview, &key, response.body.clone())
                        .await;
                }
                Ok(RouterResponse {
                    status: response.status,
                    body: response.body,
                    served_from: ServedFrom::Network,
                })
            }
            Err(e) => {
                warn!(key = %key, error = %e, "preview fetch failed with no cached copy");
                self.emit(CacheEvent::ServedSynthetic { key });
                Ok(RouterResponse::synthetic())
            }
        }
    }

    async fn stale_while_revalidate(&self, url: &str) -> Result<RouterResponse> {
        let key = self.cache_key(url)?;

        if let Some(body) = self.store.retrieve(CacheTier::AppShell, &key).await? {
            debug!(key = %key, "shell asset served from cache, revalidating");
            self.spawn_revalidation(url.to_string(), key);
            return Ok(RouterResponse {
                status: 200,
                body,
                served_from: ServedFrom::ShellCache,
            });
        }

        match self.http.execute(HttpRequest::get(url)).await {
            Ok(response) => {
                if response.is_success() {
                    self.store_fail_soft(CacheTier::AppShell, &key, response.body.clone())
                        .await;
                }
                Ok(RouterResponse {
                    status: response.status,
                    body: response.body,
                    served_from: ServedFrom::Network,
                })
            }
            Err(e) => {
                warn!(key = %key, error = %e, "shell fetch failed with no cached copy");
                self.emit(CacheEvent::ServedSynthetic { key });
                Ok(RouterResponse::synthetic())
            }
        }
    }

    async fn pass_through(&self, url: &str) -> Result<RouterResponse> {
        let response = self
            .http
            .execute(HttpRequest::get(url))
            .await
            .map_err(|e| CacheError::Network(e.to_string()))?;
        Ok(RouterResponse {
            status: response.status,
            body: response.body,
            served_from: ServedFrom::Network,
        })
    }

    /// Refresh a cached shell asset in the background. The caller has already
    /// been answered from the cache; a refresh failure only means the stale
    /// copy stays current a while longer.
    fn spawn_revalidation(&self, url: String, key: String) {
        let http = Arc::clone(&self.http);
        let store = Arc::clone(&self.store);
        let events = self.events.clone();
        tokio::spawn(async move {
            let response = match http.execute(HttpRequest::get(&url)).await {
                Ok(r) if r.is_success() => r,
                Ok(r) => {
                    debug!(key = %key, status = r.status, "shell revalidation skipped");
                    return;
                }
                Err(e) => {
                    debug!(key = %key, error = %e, "shell revalidation failed");
                    return;
                }
            };
            if let Err(e) = store.store(CacheTier::AppShell, &key, response.body).await {
                warn!(key = %key, error = %e, "shell revalidation store failed");
                return;
            }
            if let Some(events) = &events {
                let _ = events.emit(CoreEvent::Cache(CacheEvent::ShellRefreshed {
                    path: key,
                }));
            }
        });
    }

    async fn store_fail_soft(&self, tier: CacheTier, key: &str, body: Bytes) {
        match self.store.store(tier, key, body).await {
            Ok(()) => {
                if tier == CacheTier::Preview {
                    self.emit(CacheEvent::PreviewStored {
                        key: key.to_string(),
                    });
                }
            }
            Err(CacheError::StorageUnavailable) => {
                debug!(tier = %tier, key, "storage unavailable, response served uncached");
            }
            Err(e) => {
                warn!(tier = %tier, key, error = %e, "cache store failed");
            }
        }
    }

    /// Same-origin path of `url`, or `None` for cross-origin URLs.
    fn same_origin_path<'a>(&self, url: &'a str) -> Option<&'a str> {
        let rest = url.strip_prefix(&self.origin)?;
        if rest.is_empty() {
            return Some("/");
        }
        rest.starts_with('/').then_some(rest)
    }

    fn cache_key(&self, url: &str) -> Result<String> {
        self.same_origin_path(url)
            .map(str::to_string)
            .ok_or_else(|| CacheError::InvalidRequest(format!("cross-origin url: {}", url)))
    }

    fn emit(&self, event: CacheEvent) {
        if let Some(events) = &self.events {
            let _ = events.emit(CoreEvent::Cache(event));
        }
    }
}
