/// Chord qualities, key-independent chord slots and resolved chords
use super::pitch::PitchClass;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Beats given to a slot when the template doesn't say otherwise
pub const DEFAULT_SLOT_BEATS: u32 = 4;

/// Chord quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    Major,
    Minor,
    Dominant7,
    Major7,
    Minor7,
    Diminished,
    Diminished7,
    HalfDiminished7,
    Augmented,
}

impl ChordQuality {
    /// Shorthand appended to the root in chord symbols
    pub fn shorthand(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Diminished => "dim",
            ChordQuality::Diminished7 => "dim7",
            ChordQuality::HalfDiminished7 => "m7b5",
            ChordQuality::Augmented => "aug",
        }
    }

    /// Spoken name, e.g. `dominant`
    pub fn name(self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Dominant7 => "dominant",
            ChordQuality::Major7 => "major seventh",
            ChordQuality::Minor7 => "minor seventh",
            ChordQuality::Diminished => "diminished",
            ChordQuality::Diminished7 => "diminished seventh",
            ChordQuality::HalfDiminished7 => "half diminished",
            ChordQuality::Augmented => "augmented",
        }
    }

    /// Chord-tone offsets from the root, in semitones
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Diminished7 => &[0, 3, 6, 9],
            ChordQuality::HalfDiminished7 => &[0, 3, 6, 10],
            ChordQuality::Augmented => &[0, 4, 8],
        }
    }
}

/// One chord of a progression, defined relative to the key
///
/// `numeral` is the label shown to the listener; `degree`, `alteration` and
/// `quality` say how to build the chord once a key is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordSlot {
    /// Roman-numeral label, e.g. `V7`
    pub numeral: String,

    /// Scale degree of the root (1-7)
    pub degree: u8,

    /// Chromatic alteration of the root in semitones (-1, 0, +1)
    #[serde(default)]
    pub alteration: i8,

    pub quality: ChordQuality,

    /// Relative duration weight, in beats
    #[serde(default = "default_beats")]
    pub beats: u32,
}

fn default_beats() -> u32 {
    DEFAULT_SLOT_BEATS
}

impl ChordSlot {
    /// Parse a roman numeral such as `i`, `V7`, `bVII`, `iiø7` or `Imaj7`
    ///
    /// Upper-case numerals are major-family chords, lower-case numerals
    /// minor-family. The parsed slot gets [`DEFAULT_SLOT_BEATS`].
    pub fn parse(numeral: &str) -> Result<Self> {
        let text = numeral.trim();
        let invalid = || CoreError::InvalidNumeral(numeral.to_string());

        let (alteration, rest) = if let Some(rest) = text.strip_prefix('b') {
            (-1, rest)
        } else if let Some(rest) = text.strip_prefix('♭') {
            (-1, rest)
        } else if let Some(rest) = text.strip_prefix('#') {
            (1, rest)
        } else if let Some(rest) = text.strip_prefix('♯') {
            (1, rest)
        } else {
            (0, text)
        };

        let split = rest
            .find(|c: char| !matches!(c, 'I' | 'V' | 'i' | 'v'))
            .unwrap_or(rest.len());
        let (roman, suffix) = rest.split_at(split);

        let upper = roman.chars().all(|c| c.is_ascii_uppercase());
        let lower = roman.chars().all(|c| c.is_ascii_lowercase());
        if roman.is_empty() || !(upper || lower) {
            return Err(invalid());
        }

        let degree = match roman.to_ascii_uppercase().as_str() {
            "I" => 1,
            "II" => 2,
            "III" => 3,
            "IV" => 4,
            "V" => 5,
            "VI" => 6,
            "VII" => 7,
            _ => return Err(invalid()),
        };

        let quality = match (suffix, upper) {
            ("", true) => ChordQuality::Major,
            ("", false) => ChordQuality::Minor,
            ("7", true) => ChordQuality::Dominant7,
            ("7", false) => ChordQuality::Minor7,
            ("maj7" | "M7" | "Δ" | "Δ7", _) => ChordQuality::Major7,
            ("°" | "o" | "dim", _) => ChordQuality::Diminished,
            ("°7" | "o7" | "dim7", _) => ChordQuality::Diminished7,
            ("ø" | "ø7" | "m7b5", _) => ChordQuality::HalfDiminished7,
            ("+" | "aug", _) => ChordQuality::Augmented,
            _ => return Err(invalid()),
        };

        Ok(Self {
            numeral: text.to_string(),
            degree,
            alteration,
            quality,
            beats: DEFAULT_SLOT_BEATS,
        })
    }

    /// Same slot with a different duration weight
    #[must_use]
    pub fn with_beats(mut self, beats: u32) -> Self {
        self.beats = beats;
        self
    }
}

/// A chord slot bound to a concrete key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedChord {
    pub root: PitchClass,

    /// Root spelled for the key, e.g. `Bb`
    pub root_name: String,

    pub quality: ChordQuality,

    /// Chord symbol, e.g. `Dm7`
    pub display_name: String,

    /// Role relative to the key, e.g. `ii7`
    pub label: String,

    /// Duration weight carried over from the slot
    pub beats: u32,
}

impl ResolvedChord {
    /// Pitch classes of the chord tones, root first
    pub fn tones(&self) -> Vec<PitchClass> {
        self.quality
            .intervals()
            .iter()
            .map(|&interval| self.root.transpose(i32::from(interval)))
            .collect()
    }
}

impl fmt::Display for ResolvedChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.label)
    }
}
