//! Error type for melody generation and rendering.

use thiserror::Error;

/// Error type for the melody backend.
#[derive(Debug, Error)]
pub enum MelodyError {
    /// Invalid melody settings.
    #[error("Invalid melody settings: {0}")]
    InvalidSettings(String),

    /// Invalid playback parameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unknown key name.
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    /// Unknown scale name.
    #[error("Unknown scale: {0} (expected major, minor, or pentatonic)")]
    UnknownScale(String),

    /// Pitch cannot be represented in MIDI.
    #[error("Pitch {0} is outside the MIDI range 0-127")]
    PitchOutOfRange(i32),

    /// WAV encoding error.
    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),

    /// IO error during writing.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
