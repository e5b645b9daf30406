//! Chord sequencing: binds a progression template to a key

use crate::error::Result;
use crate::types::{ChordSlot, Key, ProgressionTemplate, ResolvedChord, Spelling};

/// Resolve every slot of `template` in `key`
///
/// Pure: the same template and key always produce the same sequence.
pub fn resolve(template: &ProgressionTemplate, key: &Key) -> Result<Vec<ResolvedChord>> {
    template.validate()?;
    Ok(template
        .slots
        .iter()
        .map(|slot| resolve_slot(slot, key))
        .collect())
}

/// Resolve one (already validated) slot
pub fn resolve_slot(slot: &ChordSlot, key: &Key) -> ResolvedChord {
    let root = key.degree(slot.degree).transpose(i32::from(slot.alteration));

    // Altered roots are spelled in the direction of the alteration
    let spelling = match slot.alteration {
        a if a < 0 => Spelling::Flats,
        a if a > 0 => Spelling::Sharps,
        _ => key.spelling(),
    };
    let root_name = root.name(spelling).to_string();

    ResolvedChord {
        root,
        display_name: format!("{}{}", root_name, slot.quality.shorthand()),
        root_name,
        quality: slot.quality,
        label: slot.numeral.clone(),
        beats: slot.beats,
    }
}
