//! Playback Events
//!
//! Event-based communication for UI synchronization during a session.
//! Events are emitted at key points:
//! - State changes (play/pause/stop)
//! - Chord changes, with or without the answer label
//! - Audiation label reveals
//! - Sequence wrap-around and completion
//! - Failures the caller should surface

use crate::types::PlaybackState;
use ear_core::Key;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A session was created
    SessionStarted {
        progression_id: String,
        /// Key the progression is played in
        key: Key,
    },

    /// A chord started sounding
    ChordStarted {
        /// Position in the resolved sequence
        index: usize,
        chord_name: String,
        /// Answer label, `None` while withheld (audiation)
        label: Option<String>,
        /// Melody note sounded over the chord, `None` for harmony only
        melody_note: Option<String>,
        /// Melody answer such as `si, 3`, `None` while withheld
        melody_label: Option<String>,
    },

    /// The withheld labels of an audiation step were revealed
    LabelRevealed {
        index: usize,
        label: String,
        melody_label: Option<String>,
    },

    /// The last chord finished and playback wrapped to the first
    SequenceLooped,

    /// The last chord finished and the session ended
    SequenceFinished,

    /// The renderer failed; the step continues without audio
    RendererUnavailable { index: usize, message: String },

    /// A command failed
    Error {
        /// Error message
        message: String,
    },
}
