//! # Player Core Module
//!
//! The playback half of the soundbox client core:
//! - [`SessionManager`] drives the per-sound playback state machine.
//! - [`ModeController`] owns the user-togglable modes (overlap, loop,
//!   master volume) and their persistence.
//! - [`FavoritesStore`] keeps the favorites collection in sync with its
//!   persisted JSON document.
//! - [`SoundCatalog`] and [`PreviewStreamProvider`] are the seams to the
//!   remote catalog and byte-stream collaborators.
//!
//! Everything runs against bridge traits; hosts wire in concrete engines,
//! stores, and transports.

pub mod catalog;
pub mod context;
pub mod error;
pub mod favorites;
pub mod modes;
pub mod resolver;
pub mod session;

pub use catalog::{PreviewStreamProvider, Sound, SoundCatalog, SoundPage, StreamResponse};
pub use context::PlayerContext;
pub use error::{PlayerError, Result};
pub use favorites::{FavoriteEntry, FavoritesStore};
pub use modes::{ModeController, PlaybackModes};
pub use resolver::{CachedPreviewResolver, SourceResolver};
pub use session::{AudioSession, SessionManager};
