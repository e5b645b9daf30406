/// Pitch classes and their spelling
use serde::{Deserialize, Serialize};
use std::fmt;

const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const NOTE_NAMES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// One of the 12 pitch classes (C = 0, B = 11)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PitchClass(u8);

impl PitchClass {
    /// All twelve pitch classes in ascending order from C
    pub const ALL: [PitchClass; 12] = [
        PitchClass(0),
        PitchClass(1),
        PitchClass(2),
        PitchClass(3),
        PitchClass(4),
        PitchClass(5),
        PitchClass(6),
        PitchClass(7),
        PitchClass(8),
        PitchClass(9),
        PitchClass(10),
        PitchClass(11),
    ];

    /// Create a pitch class, wrapping any value into 0..12
    pub fn new(value: i32) -> Self {
        Self(value.rem_euclid(12) as u8)
    }

    /// Semitones above C
    pub fn value(self) -> u8 {
        self.0
    }

    /// Transpose by a signed number of semitones
    #[must_use]
    pub fn transpose(self, semitones: i32) -> Self {
        Self::new(i32::from(self.0) + semitones)
    }

    /// Note name using the given spelling
    pub fn name(self, spelling: Spelling) -> &'static str {
        match spelling {
            Spelling::Sharps => NOTE_NAMES_SHARP[self.0 as usize],
            Spelling::Flats => NOTE_NAMES_FLAT[self.0 as usize],
        }
    }

    /// Parse a note name such as `C`, `F#`, `Bb` or `Cb`
    pub fn parse(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let base: i32 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        let mut offset = 0;
        for c in chars {
            match c {
                '#' | '♯' => offset += 1,
                'b' | '♭' => offset -= 1,
                _ => return None,
            }
        }
        Some(Self::new(base + offset))
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        if value < 12 {
            Ok(Self(value))
        } else {
            Err(format!("pitch class {} is outside 0..12", value))
        }
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> Self {
        pc.0
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name(Spelling::Sharps))
    }
}

/// Whether accidentals are written as sharps or flats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    Sharps,
    Flats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_into_range() {
        assert_eq!(PitchClass::new(12).value(), 0);
        assert_eq!(PitchClass::new(-1).value(), 11);
        assert_eq!(PitchClass::new(9).transpose(7).value(), 4);
    }

    #[test]
    fn parses_note_names() {
        assert_eq!(PitchClass::parse("C"), Some(PitchClass::new(0)));
        assert_eq!(PitchClass::parse("F#"), Some(PitchClass::new(6)));
        assert_eq!(PitchClass::parse("Bb"), Some(PitchClass::new(10)));
        assert_eq!(PitchClass::parse("Cb"), Some(PitchClass::new(11)));
        assert_eq!(PitchClass::parse("e"), Some(PitchClass::new(4)));
        assert_eq!(PitchClass::parse("H"), None);
        assert_eq!(PitchClass::parse(""), None);
        assert_eq!(PitchClass::parse("Cx"), None);
    }

    #[test]
    fn spelling() {
        let pc = PitchClass::new(10);
        assert_eq!(pc.name(Spelling::Flats), "Bb");
        assert_eq!(pc.name(Spelling::Sharps), "A#");
    }

    #[test]
    fn rejects_out_of_range_deserialization() {
        assert!(PitchClass::try_from(12).is_err());
        assert_eq!(PitchClass::try_from(11), Ok(PitchClass::new(11)));
    }
}
