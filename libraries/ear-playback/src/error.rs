//! Error types for playback scheduling

use ear_core::CoreError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// `start` was called with an id the catalog doesn't know
    #[error("Unknown progression id: {0}")]
    UnknownProgressionId(String),

    /// The selected progression could not be resolved
    #[error("Invalid template '{id}': {reason}")]
    InvalidTemplate { id: String, reason: String },

    /// `start` was called while a session is playing or paused
    #[error("A session is already active")]
    AlreadyActive,

    /// Playback mode or voicing changed while a session is active
    #[error("Cannot change {0} while a session is active")]
    SessionActive(&'static str),

    /// Any other theory-layer failure
    #[error("Core error: {0}")]
    Core(CoreError),
}

impl From<CoreError> for PlaybackError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownProgressionId(id) => Self::UnknownProgressionId(id),
            CoreError::InvalidTemplate { id, reason } => Self::InvalidTemplate { id, reason },
            other => Self::Core(other),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Failure reported by an [`AudioRenderer`](crate::AudioRenderer)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The renderer cannot produce output right now
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),
}
