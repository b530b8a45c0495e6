//! # Offline Cache Module
//!
//! Two-tier offline cache for the soundbox client: a permanent-intent
//! preview-audio tier populated on explicit user request, and an
//! application-shell tier kept fresh with stale-while-revalidate. The
//! [`FetchRouter`] sits in front of the network and picks a strategy per
//! resource class, degrading to pass-through when the host offers no durable
//! storage.

pub mod error;
pub mod router;
pub mod store;
pub mod tier;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{CacheError, Result};
pub use router::{
    FetchRouter, ResourceClass, RouterResponse, ServedFrom, STATUS_OFFLINE_NO_CACHE,
};
pub use store::{FetchOutcome, TierStore};
pub use tier::{is_preview_path, preview_path, CacheTier};
