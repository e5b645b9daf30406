//! Ear Trainer - Playback Scheduling
//!
//! Platform-agnostic playback engine for chord progression ear training.
//!
//! This crate provides:
//! - Session state machine (Stopped, Playing, Paused)
//! - Key selection and chord resolution on start
//! - Timed stepping through the progression on a host-driven clock
//! - Recognition and audiation labelling
//! - "No voice" rendering variant
//! - A melody tone over each chord, or harmony only
//! - Event queue and observer callbacks for UI synchronization
//!
//! # Architecture
//!
//! `ear-playback` never blocks and never touches audio:
//! - No async runtime; the host advances time with [`PlaybackScheduler::tick`]
//! - Audio output is provided via the [`AudioRenderer`] trait
//! - The progression catalog is shared read-only behind an `Arc`
//!
//! # Example
//!
//! ```rust
//! use ear_core::{FixedKeySelector, Key, ProgressionCatalog};
//! use ear_playback::{NullRenderer, PlaybackScheduler, PlaybackState, SchedulerConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let catalog = Arc::new(ProgressionCatalog::builtin());
//! let mut scheduler = PlaybackScheduler::new(
//!     catalog,
//!     Box::new(NullRenderer::new()),
//!     SchedulerConfig::default(),
//! )
//! .with_key_selector(Box::new(FixedKeySelector(Key::parse("Am").unwrap())));
//!
//! scheduler.start("minor_cadence").unwrap();
//! assert_eq!(scheduler.current_chord_name(), "Am");
//!
//! // Each chord lasts 4 beats at 120 bpm
//! scheduler.tick(Duration::from_secs(2));
//! assert_eq!(scheduler.current_chord_name(), "Dm");
//!
//! scheduler.stop();
//! assert_eq!(scheduler.state(), PlaybackState::Stopped);
//! ```

mod error;
mod events;
mod renderer;
mod scheduler;
pub mod timer;
pub mod types;

// Public exports
pub use error::{PlaybackError, RenderError, Result};
pub use events::PlaybackEvent;
pub use renderer::{AudioRenderer, NullRenderer, RenderHandle};
pub use scheduler::{EventObserver, PlaybackScheduler};
pub use types::{EndBehavior, PlaybackMode, PlaybackState, SchedulerConfig, SessionSnapshot};
