//! SingTheVerse Melody Backend - deterministic verse melodies and rendering
//!
//! This crate turns verse text into a melody, lays it out on a tempo-scaled
//! playback timeline, and renders that timeline to audio or MIDI files.
//!
//! # Determinism
//!
//! Melody generation is a pure function of the verse text and the
//! [`MelodySettings`]: the seed is a 32-bit FNV-1a hash of
//! `text + "|" + settings_json`, hashed over UTF-16 code units so the same
//! verse sings the same tune in every client. Rendering adds no randomness,
//! so WAV and MIDI output is byte-identical for identical inputs.
//!
//! # Example
//!
//! ```
//! use singverse_melody::{generate_melody, render_wav, MelodySettings, RenderOptions, Schedule};
//!
//! let notes = generate_melody("Jesus wept.", &MelodySettings::default());
//! let schedule = Schedule::build(&notes, 1.0).unwrap();
//! let options = RenderOptions { sample_rate: 8000, ..RenderOptions::default() };
//! let result = render_wav(&schedule, &options).unwrap();
//!
//! assert_eq!(result.extension, "wav");
//! assert_eq!(result.hash.len(), 64);
//! ```
//!
//! # Module Structure
//!
//! - [`scale`]: Keys and scales
//! - [`generate`]: Verse-to-melody mapping
//! - [`playback`]: Schedules, playback settings, speech plans
//! - [`envelope`]: ADSR envelope
//! - [`render`]: WAV rendering
//! - [`midi`]: MIDI file output
//! - [`note`]: Note/frequency conversion utilities

pub mod envelope;
pub mod error;
pub mod generate;
pub mod midi;
pub mod note;
pub mod playback;
pub mod render;
pub mod scale;

// Re-export main types
pub use error::MelodyError;
pub use generate::{
    generate_melody, melody_seed, split_words, word_duration, MelodyNote, MelodySettings,
};
pub use midi::render_midi;
pub use note::{midi_to_freq, midi_to_name};
pub use playback::{
    gain_to_db, PlaybackMode, PlaybackSettings, Schedule, ScheduledNote, SpeechPlan, MAX_TEMPO,
    MIN_TEMPO,
};
pub use render::{render_wav, RenderOptions, RenderResult, DEFAULT_SAMPLE_RATE};
pub use scale::{Key, Scale};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier for cache keys.
pub const BACKEND_ID: &str = "singverse-melody";
