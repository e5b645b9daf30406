//! Key selection for playback sessions

use crate::types::{Key, Mode, PitchClass};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Chooses the key a progression is played in
///
/// `allowed` lists the modes the progression can be realised in; an empty
/// slice means any mode.
pub trait KeySelector {
    fn pick(&mut self, allowed: &[Mode]) -> Key;
}

/// Uniform random key selection
///
/// The tonic is drawn uniformly from the 12 pitch classes and the mode
/// uniformly from the allowed modes.
#[derive(Debug, Clone)]
pub struct RandomKeySelector {
    rng: StdRng,
}

impl RandomKeySelector {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic selector for reproducible sessions
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomKeySelector {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySelector for RandomKeySelector {
    fn pick(&mut self, allowed: &[Mode]) -> Key {
        let tonic = PitchClass::new(self.rng.gen_range(0..12));
        let pool = if allowed.is_empty() {
            &Mode::ALL[..]
        } else {
            allowed
        };
        let mode = pool.choose(&mut self.rng).copied().unwrap_or(Mode::Major);
        Key::new(tonic, mode)
    }
}

/// Always returns the same key
///
/// Used when the listener asks for a specific key. The key's mode wins over
/// the progression's allowed modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedKeySelector(pub Key);

impl KeySelector for FixedKeySelector {
    fn pick(&mut self, _allowed: &[Mode]) -> Key {
        self.0
    }
}
