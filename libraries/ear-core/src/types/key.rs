/// Musical keys: a tonic plus a mode
use super::pitch::{PitchClass, Spelling};
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scale type a key is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Ionian
    Major,
    /// Natural minor (aeolian)
    Minor,
    Dorian,
    Mixolydian,
}

impl Mode {
    /// Every supported mode
    pub const ALL: [Mode; 4] = [Mode::Major, Mode::Minor, Mode::Dorian, Mode::Mixolydian];

    /// Semitone offsets of the seven scale degrees from the tonic
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => [0, 2, 3, 5, 7, 8, 10],
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
        }
    }

    /// Distance from the relative major's tonic up to this mode's tonic
    fn offset_from_parent_major(self) -> i32 {
        match self {
            Mode::Major => 0,
            Mode::Dorian => 2,
            Mode::Mixolydian => 7,
            Mode::Minor => 9,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Dorian => "dorian",
            Self::Mixolydian => "mixolydian",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "major" | "maj" | "ionian" => Some(Self::Major),
            "minor" | "min" | "aeolian" => Some(Self::Minor),
            "dorian" => Some(Self::Dorian),
            "mixolydian" => Some(Self::Mixolydian),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tonic pitch class plus a mode
///
/// Chosen once per playback session and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub tonic: PitchClass,
    pub mode: Mode,
}

/// Tonics of the major keys written with flats (F, Bb, Eb, Ab, Db, Gb)
const FLAT_PARENT_MAJORS: [u8; 6] = [5, 10, 3, 8, 1, 6];

impl Key {
    pub fn new(tonic: PitchClass, mode: Mode) -> Self {
        Self { tonic, mode }
    }

    /// Spelling implied by the key signature
    ///
    /// Derived from the relative major: F, Bb, Eb, Ab, Db and Gb majors
    /// (and their modes) use flats, every other signature uses sharps.
    pub fn spelling(&self) -> Spelling {
        if FLAT_PARENT_MAJORS.contains(&self.parent_major().value()) {
            Spelling::Flats
        } else {
            Spelling::Sharps
        }
    }

    /// Tonic of the relative major, the movable "do" of the key
    pub fn parent_major(&self) -> PitchClass {
        self.tonic.transpose(-self.mode.offset_from_parent_major())
    }

    /// Spelled tonic name, e.g. `Eb`
    pub fn tonic_name(&self) -> &'static str {
        self.tonic.name(self.spelling())
    }

    /// Pitch class of a scale degree (1-based), wrapping past the octave
    pub fn degree(&self, degree: u8) -> PitchClass {
        let intervals = self.mode.intervals();
        let index = (usize::from(degree.max(1)) - 1) % intervals.len();
        self.tonic.transpose(i32::from(intervals[index]))
    }

    /// Parse a key name
    ///
    /// Accepts `C`, `Am`, `F#m`, `Bbm`, or a note followed by a mode name
    /// such as `D dorian` / `Eb major`. Single-token names are case
    /// insensitive after the letter, so `AM`, `EBM` and `BB` read as A minor,
    /// Eb minor and Bb major.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidKey(text.to_string());
        let mut parts = text.split_whitespace();
        let note = parts.next().ok_or_else(invalid)?;

        if let Some(mode_name) = parts.next() {
            if parts.next().is_some() {
                return Err(invalid());
            }
            let tonic = PitchClass::parse(note).ok_or_else(invalid)?;
            let mode = Mode::from_str(mode_name).ok_or_else(invalid)?;
            return Ok(Self::new(tonic, mode));
        }

        let (note, mode) = match note.strip_suffix(&['m', 'M'][..]) {
            Some(stripped) if !stripped.is_empty() => (stripped, Mode::Minor),
            _ => (note, Mode::Major),
        };
        let mut chars = note.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let accidentals: String = chars.map(|c| if c == 'B' { 'b' } else { c }).collect();
        let tonic = PitchClass::parse(&format!("{letter}{accidentals}")).ok_or_else(invalid)?;
        Ok(Self::new(tonic, mode))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tonic_name(), self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(tonic: i32, mode: Mode) -> Key {
        Key::new(PitchClass::new(tonic), mode)
    }

    #[test]
    fn spelling_follows_signature() {
        assert_eq!(key(0, Mode::Major).spelling(), Spelling::Sharps);
        assert_eq!(key(5, Mode::Major).spelling(), Spelling::Flats);
        // D minor is relative to F major
        assert_eq!(key(2, Mode::Minor).spelling(), Spelling::Flats);
        // E minor is relative to G major
        assert_eq!(key(4, Mode::Minor).spelling(), Spelling::Sharps);
        // C dorian is relative to Bb major
        assert_eq!(key(0, Mode::Dorian).spelling(), Spelling::Flats);
        // The six-accidental signature is written as Gb rather than F#
        assert_eq!(key(6, Mode::Major).tonic_name(), "Gb");
        assert_eq!(key(6, Mode::Minor).tonic_name(), "F#");
        assert_eq!(key(3, Mode::Minor).tonic_name(), "Eb");
        assert_eq!(key(8, Mode::Minor).tonic_name(), "G#");
    }

    #[test]
    fn parent_major_is_do() {
        assert_eq!(key(9, Mode::Minor).parent_major(), PitchClass::new(0));
        assert_eq!(key(2, Mode::Minor).parent_major(), PitchClass::new(5));
        assert_eq!(key(2, Mode::Dorian).parent_major(), PitchClass::new(0));
        assert_eq!(key(7, Mode::Major).parent_major(), PitchClass::new(7));
    }

    #[test]
    fn scale_degrees() {
        let a_minor = key(9, Mode::Minor);
        assert_eq!(a_minor.degree(1), PitchClass::new(9));
        assert_eq!(a_minor.degree(4), PitchClass::new(2));
        assert_eq!(a_minor.degree(5), PitchClass::new(4));
        assert_eq!(a_minor.degree(7), PitchClass::new(7));
    }

    #[test]
    fn parses_key_names() {
        assert_eq!(Key::parse("C").unwrap(), key(0, Mode::Major));
        assert_eq!(Key::parse("Am").unwrap(), key(9, Mode::Minor));
        assert_eq!(Key::parse("F#m").unwrap(), key(6, Mode::Minor));
        assert_eq!(Key::parse("Bbm").unwrap(), key(10, Mode::Minor));
        assert_eq!(Key::parse("Bb").unwrap(), key(10, Mode::Major));
        assert_eq!(Key::parse("D dorian").unwrap(), key(2, Mode::Dorian));
        assert_eq!(Key::parse("G mixolydian").unwrap(), key(7, Mode::Mixolydian));
        assert!(Key::parse("").is_err());
        assert!(Key::parse("X").is_err());
        assert!(Key::parse("C lydian").is_err());
        assert!(Key::parse("C major extra").is_err());
    }

    #[test]
    fn parses_upper_case_key_names() {
        assert_eq!(Key::parse("AM").unwrap(), key(9, Mode::Minor));
        assert_eq!(Key::parse("DM").unwrap(), key(2, Mode::Minor));
        assert_eq!(Key::parse("F#M").unwrap(), key(6, Mode::Minor));
        assert_eq!(Key::parse("EBM").unwrap(), key(3, Mode::Minor));
        assert_eq!(Key::parse("BB").unwrap(), key(10, Mode::Major));
        assert_eq!(Key::parse("B").unwrap(), key(11, Mode::Major));
        assert_eq!(Key::parse("BM").unwrap(), key(11, Mode::Minor));
        assert!(Key::parse("M").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(key(9, Mode::Minor).to_string(), "A minor");
        assert_eq!(key(3, Mode::Major).to_string(), "Eb major");
    }
}
