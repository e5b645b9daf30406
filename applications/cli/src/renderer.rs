//! Console renderer
//!
//! Stands in for a synthesizer: logs the notes each chord would sound.

use ear_core::voicing::note_name;
use ear_core::{voice_chord, MelodyTone, ResolvedChord, Spelling};
use ear_playback::{AudioRenderer, RenderError, RenderHandle};

#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    next_id: u64,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Note names for a chord, spelled like its root
pub fn describe_voicing(chord: &ResolvedChord, no_voice: bool) -> Vec<String> {
    let spelling = if chord.root_name.contains('b') {
        Spelling::Flats
    } else {
        Spelling::Sharps
    };
    voice_chord(chord, no_voice)
        .notes()
        .into_iter()
        .map(|note| note_name(note, spelling))
        .collect()
}

impl AudioRenderer for ConsoleRenderer {
    fn render(
        &mut self,
        chord: &ResolvedChord,
        melody: Option<&MelodyTone>,
        no_voice: bool,
    ) -> Result<RenderHandle, RenderError> {
        self.next_id += 1;
        tracing::info!(
            handle = self.next_id,
            melody = melody.map_or("-", |m| m.note_name.as_str()),
            "Sounding {}: {}",
            chord.display_name,
            describe_voicing(chord, no_voice).join(" ")
        );
        Ok(RenderHandle::new(self.next_id))
    }

    fn cancel(&mut self, handle: RenderHandle) {
        tracing::debug!(handle = handle.id(), "Released");
    }
}
