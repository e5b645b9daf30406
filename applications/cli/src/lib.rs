//! Ear Trainer CLI Library
//!
//! Terminal front end for the playback engine: configuration layering, a
//! console renderer and the tokio session driver.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod driver;
pub mod error;
pub mod renderer;

// Re-export commonly used types for convenience
pub use crate::config::{AppConfig, Overrides};
pub use driver::{describe_event, event_json, run_session, Command};
pub use error::{AppError, Result};
pub use renderer::ConsoleRenderer;
