//! Melody tones
//!
//! Over each chord one chord tone can be sounded high above the voicing. The
//! listener names it by its movable-do syllable and its position in the chord
//! (1, 3, 5 or 7), e.g. `si, 3`. When the same syllable and position occur
//! over chords of different quality in one progression, the quality is
//! appended to tell them apart: `do, 1, major` against `do, 1, minor`.
//!
//! Syllables are counted from the relative major's tonic, so in A minor the
//! tonic is `la` and the raised leading tone is `si`.

use crate::types::{ChordQuality, Key, PitchClass, ResolvedChord, Spelling};
use crate::voicing::{midi_note, note_name};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Octaves a melody tone is drawn from
pub const MELODY_OCTAVES: [u8; 2] = [5, 6];

/// Chromatic solfege from do, raised syllables below the fifth, lowered above
const SOLFEGE: [&str; 12] = [
    "do", "di", "re", "me", "mi", "fa", "fi", "sol", "si", "la", "te", "ti",
];

/// Semitones above the key's do
fn step(pitch: PitchClass, key: &Key) -> u8 {
    pitch
        .transpose(-i32::from(key.parent_major().value()))
        .value()
}

/// Movable-do syllable of a pitch class in `key`
pub fn solfege(pitch: PitchClass, key: &Key) -> &'static str {
    SOLFEGE[usize::from(step(pitch, key))]
}

/// Position of the chord tone at `index`: 1, 3, 5 or 7
pub fn chord_position(index: usize) -> u8 {
    [1, 3, 5, 7].get(index).copied().unwrap_or(1)
}

/// One chord tone sounded as a melody note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MelodyTone {
    pub midi: u8,

    /// Note name with octave, e.g. `G#5`
    pub note_name: String,

    pub syllable: String,

    /// 1, 3, 5 or 7
    pub position: u8,

    /// Quality of the chord the tone belongs to
    pub quality: ChordQuality,

    /// What the listener should name, e.g. `si, 3` or `do, 1, minor`
    pub label: String,
}

/// Melody labelling for one progression in one key
#[derive(Debug, Clone)]
pub struct MelodyLabels {
    key: Key,

    /// (step, position) pairs heard over more than one chord quality
    ambiguous: HashSet<(u8, u8)>,
}

impl MelodyLabels {
    pub fn new(key: Key, sequence: &[ResolvedChord]) -> Self {
        let mut qualities: HashMap<(u8, u8), HashSet<ChordQuality>> = HashMap::new();
        for chord in sequence {
            for (index, tone) in chord.tones().into_iter().enumerate() {
                qualities
                    .entry((step(tone, &key), chord_position(index)))
                    .or_default()
                    .insert(chord.quality);
            }
        }

        let ambiguous = qualities
            .into_iter()
            .filter(|(_, seen)| seen.len() > 1)
            .map(|(label, _)| label)
            .collect();
        Self { key, ambiguous }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// The chord tone at `index` sounded in `octave`, `None` past the last tone
    pub fn tone(&self, chord: &ResolvedChord, index: usize, octave: u8) -> Option<MelodyTone> {
        let pitch = chord.tones().get(index).copied()?;
        let step = step(pitch, &self.key);
        let syllable = SOLFEGE[usize::from(step)];
        let position = chord_position(index);

        let label = if self.ambiguous.contains(&(step, position)) {
            format!("{}, {}, {}", syllable, position, chord.quality.name())
        } else {
            format!("{}, {}", syllable, position)
        };

        let spelling = match syllable {
            "di" | "fi" | "si" => Spelling::Sharps,
            "me" | "te" => Spelling::Flats,
            _ => self.key.spelling(),
        };
        let midi = midi_note(pitch.value(), octave);

        Some(MelodyTone {
            midi,
            note_name: note_name(midi, spelling),
            syllable: syllable.to_string(),
            position,
            quality: chord.quality,
            label,
        })
    }
}

/// Random choice of the melody tone over each chord
///
/// Tone and octave are both drawn uniformly.
#[derive(Debug, Clone)]
pub struct MelodyPicker {
    rng: StdRng,
}

impl MelodyPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic picker for reproducible sessions
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn pick(&mut self, labels: &MelodyLabels, chord: &ResolvedChord) -> Option<MelodyTone> {
        let count = chord.quality.intervals().len();
        let index = self.rng.gen_range(0..count);
        let octave = MELODY_OCTAVES.choose(&mut self.rng).copied()?;
        labels.tone(chord, index, octave)
    }
}

impl Default for MelodyPicker {
    fn default() -> Self {
        Self::new()
    }
}
