//! Chord voicing
//!
//! Turns a resolved chord into MIDI notes for renderers: a bass doubling of
//! the root in the low register plus the chord tones stacked in close
//! position above it. The "no voice" variant drops the bass doubling.

use crate::types::{ResolvedChord, Spelling};
use serde::{Deserialize, Serialize};

/// Octave of the bass doubling
pub const BASS_OCTAVE: u8 = 2;

/// Octave the upper voicing starts in
pub const UPPER_OCTAVE: u8 = 3;

/// Concrete notes for one chord
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voicing {
    /// Root doubled in the bass register (absent for "no voice")
    pub bass: Option<u8>,

    /// Chord tones in close position, ascending
    pub upper: Vec<u8>,
}

impl Voicing {
    /// All notes, lowest first
    pub fn notes(&self) -> Vec<u8> {
        self.bass.iter().copied().chain(self.upper.iter().copied()).collect()
    }
}

/// MIDI note number for a pitch class in an octave (C4 = 60)
pub fn midi_note(pitch_class: u8, octave: u8) -> u8 {
    (octave + 1) * 12 + pitch_class
}

/// Note name with octave, e.g. `Bb3`
pub fn note_name(midi: u8, spelling: Spelling) -> String {
    let pitch = crate::types::PitchClass::new(i32::from(midi));
    format!("{}{}", pitch.name(spelling), i32::from(midi / 12) - 1)
}

/// Voice a chord; `no_voice` omits the bass doubling
pub fn voice_chord(chord: &ResolvedChord, no_voice: bool) -> Voicing {
    let root = midi_note(chord.root.value(), UPPER_OCTAVE);
    let upper = chord
        .quality
        .intervals()
        .iter()
        .map(|&interval| root + interval)
        .collect();

    let bass = if no_voice {
        None
    } else {
        Some(midi_note(chord.root.value(), BASS_OCTAVE))
    };

    Voicing { bass, upper }
}
