//! Audio renderer seam
//!
//! The scheduler never touches audio. It asks a renderer to sound a chord and
//! later cancels the returned handle; synthesis, MIDI output or a console
//! printout all live behind this trait.

use crate::error::RenderError;
use ear_core::{MelodyTone, ResolvedChord};

/// Handle to one in-flight chord rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(u64);

impl RenderHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Platform-specific chord output
///
/// The scheduler owns each handle for exactly one chord step and cancels it
/// at step end, pause or stop.
pub trait AudioRenderer {
    /// Start sounding `chord`, with `melody` on top when given
    ///
    /// With `no_voice` the bass/root doubling is omitted and only the upper
    /// voicing is played (see [`ear_core::voice_chord`]). One handle covers
    /// the chord and its melody tone.
    fn render(
        &mut self,
        chord: &ResolvedChord,
        melody: Option<&MelodyTone>,
        no_voice: bool,
    ) -> Result<RenderHandle, RenderError>;

    /// Silence a previously rendered chord
    ///
    /// Cancelling a handle that already finished is a no-op.
    fn cancel(&mut self, handle: RenderHandle);
}

/// Silent renderer
///
/// Always succeeds; useful for headless sessions and tests.
#[derive(Debug, Default)]
pub struct NullRenderer {
    next_id: u64,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioRenderer for NullRenderer {
    fn render(
        &mut self,
        _chord: &ResolvedChord,
        _melody: Option<&MelodyTone>,
        _no_voice: bool,
    ) -> Result<RenderHandle, RenderError> {
        self.next_id += 1;
        Ok(RenderHandle::new(self.next_id))
    }

    fn cancel(&mut self, _handle: RenderHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use ear_core::{resolve, Key, ProgressionCatalog};

    #[test]
    fn null_renderer_hands_out_distinct_handles() {
        let catalog = ProgressionCatalog::builtin();
        let key = Key::parse("C").unwrap();
        let chords = resolve(catalog.lookup("major_cadence").unwrap(), &key).unwrap();

        let mut renderer = NullRenderer::new();
        let first = renderer.render(&chords[0], None, false).unwrap();
        let second = renderer.render(&chords[1], None, true).unwrap();
        assert_ne!(first, second);
        renderer.cancel(first);
    }
}
