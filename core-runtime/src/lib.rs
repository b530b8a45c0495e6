//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the soundbox client core:
//! - Logging and tracing setup
//! - Configuration management
//! - Event bus system
//!
//! Other core crates depend on this one for the event broadcasting and
//! logging conventions used throughout the workspace.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::CoreConfig;
pub use error::{Error, Result};
pub use events::EventBus;
