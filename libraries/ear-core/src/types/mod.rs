/// Domain types for the ear trainer
mod chord;
mod key;
mod pitch;
mod progression;

pub use chord::{ChordQuality, ChordSlot, ResolvedChord, DEFAULT_SLOT_BEATS};
pub use key::{Key, Mode};
pub use pitch::{PitchClass, Spelling};
pub use progression::ProgressionTemplate;
