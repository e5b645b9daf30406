//! Ear Trainer Core
//!
//! Platform-agnostic music theory for the ear trainer.
//!
//! This crate provides:
//! - **Domain Types**: `PitchClass`, `Key`, `Mode`, `ChordSlot`, `ResolvedChord`
//! - **Catalog**: the read-only registry of named progressions
//! - **Key Selection**: random or fixed choice of the session key
//! - **Sequencing**: binding a progression template to a key
//! - **Voicing**: MIDI notes for renderers, with the "no voice" variant
//! - **Melody**: a chord tone above the voicing, named by solfege and position
//!
//! # Example
//!
//! ```rust
//! use ear_core::{resolve, Key, Mode, PitchClass, ProgressionCatalog};
//!
//! let catalog = ProgressionCatalog::builtin();
//! let template = catalog.lookup("minor_cadence").unwrap();
//!
//! let key = Key::new(PitchClass::new(9), Mode::Minor);
//! let chords = resolve(template, &key).unwrap();
//!
//! let names: Vec<&str> = chords.iter().map(|c| c.display_name.as_str()).collect();
//! assert_eq!(names, vec!["Am", "Dm", "Em", "Am"]);
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod key_selector;
pub mod melody;
pub mod sequencer;
pub mod types;
pub mod voicing;

// Re-export commonly used types
pub use catalog::ProgressionCatalog;
pub use error::{CoreError, Result};
pub use key_selector::{FixedKeySelector, KeySelector, RandomKeySelector};
pub use melody::{MelodyLabels, MelodyPicker, MelodyTone};
pub use sequencer::resolve;
pub use types::{
    ChordQuality, ChordSlot, Key, Mode, PitchClass, ProgressionTemplate, ResolvedChord, Spelling,
};
pub use voicing::{voice_chord, Voicing};
