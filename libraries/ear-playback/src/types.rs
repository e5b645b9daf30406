//! Core types for playback scheduling

use ear_core::Key;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No session
    #[default]
    Stopped,

    /// Stepping through the progression
    Playing,

    /// Session held at the current chord
    Paused,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Stopped => "stopped",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// When the answer label is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// Label shown together with the sound
    #[default]
    Recognition,

    /// Label withheld until the chord has finished sounding
    Audiation,
}

impl PlaybackMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackMode::Recognition => "recognition",
            PlaybackMode::Audiation => "audiation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "recognition" => Some(PlaybackMode::Recognition),
            "audiation" => Some(PlaybackMode::Audiation),
            _ => None,
        }
    }
}

/// What happens after the last chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndBehavior {
    /// Start again from the first chord
    #[default]
    Loop,

    /// End the session
    Stop,
}

impl EndBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndBehavior::Loop => "loop",
            EndBehavior::Stop => "stop",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "loop" => Some(EndBehavior::Loop),
            "stop" => Some(EndBehavior::Stop),
            _ => None,
        }
    }
}

/// Configuration for the playback scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Tempo in beats per minute (default: 120)
    pub tempo_bpm: u32,

    /// How long an audiation label stays up before the next chord (default: 3s)
    pub reveal_hold: Duration,

    /// Behaviour at the end of the sequence (default: Loop)
    pub end_behavior: EndBehavior,

    /// Sound the chords alone, without a melody tone (default: false)
    pub harmony_only: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tempo_bpm: 120,
            reveal_hold: Duration::from_secs(3),
            end_behavior: EndBehavior::Loop,
            harmony_only: false,
        }
    }
}

impl SchedulerConfig {
    /// Sounding time of a slot with the given weight
    pub fn slot_duration(&self, beats: u32) -> Duration {
        let tempo = u64::from(self.tempo_bpm.max(1));
        Duration::from_millis(u64::from(beats) * 60_000 / tempo)
    }
}

/// Everything the presentation layer can observe, in one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: PlaybackState,
    pub playback_mode: PlaybackMode,
    pub no_voice: bool,
    pub progression_id: Option<String>,
    pub key: Option<Key>,
    pub current_index: Option<usize>,
    pub current_chord_name: String,
    pub current_label: String,
    /// Sounding melody note, e.g. `G#5`
    pub current_melody_note: Option<String>,
    /// Melody answer, empty when withheld or harmony only
    pub current_melody_label: String,
}
