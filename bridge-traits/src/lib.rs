//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the core crates and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that differs per platform:
//!
//! - [`HttpClient`](http::HttpClient) - async HTTP with retry support, used
//!   by the cache layer to populate tiers
//! - [`BlobStore`](storage::BlobStore) - durable named-tier byte-blob
//!   storage backing the offline cache
//! - [`SettingsStore`](storage::SettingsStore) - typed key-value persistence
//!   for playback modes, volume, and favorites
//! - [`AudioEngine`](audio::AudioEngine) / [`AudioHandle`](audio::AudioHandle)
//!   - owned playback handles routed through a single shared gain stage
//! - [`Clock`](time::Clock) - time source for deterministic testing
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Platform
//! implementations should convert platform-specific errors and provide
//! actionable messages. A missing capability (e.g. no blob storage in the
//! runtime) is reported as `NotAvailable`; the core degrades rather than
//! failing.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks.

pub mod audio;
pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use audio::{AudioEngine, AudioHandle, AudioSource};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use storage::{BlobStore, SettingsStore};
pub use time::{Clock, SystemClock};
