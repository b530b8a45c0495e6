//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the host
//! capabilities the core crates depend on:
//! - `HttpClient` using `reqwest`
//! - `BlobStore` using per-tier directories on the local file system
//! - `SettingsStore` using a SQLite-backed key-value store
//!
//! The `AudioEngine` capability is host-specific and not provided here; the
//! embedding application wires in its own engine (the core crates only ever
//! see the trait).
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{FsBlobStore, ReqwestHttpClient, SqliteSettingsStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http = ReqwestHttpClient::new();
//!     let blobs = FsBlobStore::in_cache_dir("soundbox-cache");
//!     // Wire into the core configuration
//! }
//! ```

mod blob_store;
mod http;
mod settings;

pub use blob_store::FsBlobStore;
pub use http::ReqwestHttpClient;
pub use settings::SqliteSettingsStore;
