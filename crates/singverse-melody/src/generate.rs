//! Deterministic verse-to-melody mapping.
//!
//! Every word of a verse becomes one note. The pitch of each note is picked
//! by a hash-seeded index into the chosen scale, spread across the configured
//! octave range; the duration grows with word length and gets a pause bonus
//! for trailing punctuation. The mapping is a pure function of the text and
//! the settings.

use serde::{Deserialize, Serialize};

use crate::error::MelodyError;
use crate::note::{MIDI_MAX, MIDI_MIN};
use crate::scale::{Key, Scale};

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 16_777_619;

/// Multiplier applied to the word position when picking a scale index.
const POSITION_STRIDE: u64 = 31;
/// Multiplier applied to the word length when picking a scale index.
const LENGTH_STRIDE: u64 = 13;

/// Shortest note, in seconds.
pub const MIN_NOTE_DURATION: f64 = 0.18;
/// Longest note, in seconds.
pub const MAX_NOTE_DURATION: f64 = 0.8;
/// Seconds added per character of the word.
const DURATION_PER_CHAR: f64 = 0.03;
/// Seconds added when a word ends in punctuation.
const PUNCTUATION_PAUSE: f64 = 0.2;

/// Characters that earn a punctuation pause when they end a word.
const PAUSE_PUNCTUATION: [char; 6] = [',', '.', '!', '?', ';', ':'];

/// Melody generation settings.
///
/// Field order and names are part of the seed: the settings are serialized as
/// compact JSON (`{"key":"C","scale":"major","lowOctave":3,"highOctave":5}`)
/// and hashed together with the verse text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MelodySettings {
    /// Tonic pitch class.
    pub key: Key,
    /// Scale family.
    pub scale: Scale,
    /// Lowest octave (MIDI convention, C4 = 60).
    pub low_octave: i8,
    /// Highest octave.
    pub high_octave: i8,
}

impl Default for MelodySettings {
    fn default() -> Self {
        Self {
            key: Key::C,
            scale: Scale::Major,
            low_octave: 3,
            high_octave: 5,
        }
    }
}

impl MelodySettings {
    /// Number of octaves spanned; never less than one.
    pub fn octave_span(&self) -> u32 {
        (i32::from(self.high_octave) - i32::from(self.low_octave) + 1).max(1) as u32
    }

    /// Inclusive range of pitches generation can produce with these settings.
    pub fn pitch_range(&self) -> (i32, i32) {
        let base = i32::from(self.key.semitone());
        let low = 12 * (i32::from(self.low_octave) + 1) + base;
        let top_degree = self.scale.degrees().last().copied().unwrap_or(0) as i32;
        let high = 12 * (i32::from(self.low_octave) + self.octave_span() as i32) + base + top_degree;
        (low, high)
    }

    /// Compact JSON form hashed into the seed.
    pub fn seed_json(&self) -> String {
        // Plain enums and integers always serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Checks that the octave range is ordered and every reachable pitch is a
    /// valid MIDI note.
    pub fn validate(&self) -> Result<(), MelodyError> {
        if self.high_octave < self.low_octave {
            return Err(MelodyError::InvalidSettings(format!(
                "highOctave ({}) must not be below lowOctave ({})",
                self.high_octave, self.low_octave
            )));
        }
        let (low, high) = self.pitch_range();
        if low < i32::from(MIDI_MIN) || high > i32::from(MIDI_MAX) {
            return Err(MelodyError::InvalidSettings(format!(
                "octaves {}-{} in {} produce pitches {}-{}, outside MIDI {}-{}",
                self.low_octave, self.high_octave, self.key, low, high, MIDI_MIN, MIDI_MAX
            )));
        }
        Ok(())
    }
}

/// One generated note: the word it sings, its MIDI pitch, and its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelodyNote {
    pub word: String,
    /// MIDI pitch (C4 = 60).
    pub midi: i32,
    /// Length in seconds at tempo 1.0.
    pub duration: f64,
}

/// 32-bit FNV-1a over the UTF-16 code units of `input`.
///
/// # Examples
/// ```
/// use singverse_melody::generate::fnv1a_utf16;
///
/// assert_eq!(fnv1a_utf16(""), 2_166_136_261);
/// assert_eq!(fnv1a_utf16("a"), 0xe40c_292c);
/// ```
pub fn fnv1a_utf16(input: &str) -> u32 {
    input.encode_utf16().fold(FNV_OFFSET_BASIS, |h, unit| {
        (h ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Seed for a verse: the hash of `text|settings_json`.
pub fn melody_seed(text: &str, settings: &MelodySettings) -> u32 {
    fnv1a_utf16(&format!("{}|{}", text, settings.seed_json()))
}

/// Word length in UTF-16 code units, the unit browser clients measure in.
fn word_len(word: &str) -> usize {
    word.encode_utf16().count()
}

/// Whitespace as the ECMAScript `\s` class defines it: Unicode white space
/// plus U+FEFF, minus U+0085.
fn is_word_separator(c: char) -> bool {
    c == '\u{FEFF}' || (c != '\u{0085}' && c.is_whitespace())
}

/// Splits verse text into words, dropping empty pieces.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_word_separator).filter(|w| !w.is_empty())
}

/// Note length for a word, before tempo scaling.
pub fn word_duration(word: &str) -> f64 {
    let len = word_len(word) as f64;
    let pause = if word.ends_with(PAUSE_PUNCTUATION) {
        PUNCTUATION_PAUSE
    } else {
        0.0
    };
    (MIN_NOTE_DURATION + len * DURATION_PER_CHAR + pause).clamp(MIN_NOTE_DURATION, MAX_NOTE_DURATION)
}

/// Generates the melody for a verse.
///
/// Words are the pieces of `text` between whitespace (see [`split_words`]).
/// For word `i` of length `len` in UTF-16 code units, the scale index is `(seed + 31*i + 13*len) mod (degrees * octaves)`;
/// its remainder picks the degree and its quotient the octave above
/// `low_octave`.
///
/// # Examples
/// ```
/// use singverse_melody::{generate_melody, MelodySettings};
///
/// let settings = MelodySettings::default();
/// let a = generate_melody("Jesus wept.", &settings);
/// let b = generate_melody("Jesus wept.", &settings);
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 2);
/// assert_eq!(a[1].word, "wept.");
/// ```
pub fn generate_melody(text: &str, settings: &MelodySettings) -> Vec<MelodyNote> {
    let seed = u64::from(melody_seed(text, settings));
    let base = i32::from(settings.key.semitone());
    let degrees = settings.scale.degrees();
    let scale_len = degrees.len() as u64;
    let modulus = scale_len * u64::from(settings.octave_span());

    split_words(text)
        .enumerate()
        .map(|(i, word)| {
            let len = word_len(word) as u64;
            let index = (seed + i as u64 * POSITION_STRIDE + len * LENGTH_STRIDE) % modulus;
            let degree = i32::from(degrees[(index % scale_len) as usize]);
            let octave = i32::from(settings.low_octave) + (index / scale_len) as i32;
            MelodyNote {
                word: word.to_string(),
                midi: 12 * (octave + 1) + base + degree,
                duration: word_duration(word),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_json_shape() {
        assert_eq!(
            MelodySettings::default().seed_json(),
            r#"{"key":"C","scale":"major","lowOctave":3,"highOctave":5}"#
        );
        let settings = MelodySettings {
            key: Key::FSharp,
            scale: Scale::Pentatonic,
            low_octave: 2,
            high_octave: 4,
        };
        assert_eq!(
            settings.seed_json(),
            r#"{"key":"F#","scale":"pentatonic","lowOctave":2,"highOctave":4}"#
        );
    }

    #[test]
    fn test_every_setting_changes_seed() {
        let text = "Jesus wept.";
        let base = MelodySettings::default();
        let variants = [
            MelodySettings { key: Key::D, ..base },
            MelodySettings { scale: Scale::Minor, ..base },
            MelodySettings { low_octave: 2, ..base },
            MelodySettings { high_octave: 6, ..base },
        ];
        let seed = melody_seed(text, &base);
        for variant in &variants {
            assert_ne!(melody_seed(text, variant), seed, "{:?}", variant);
        }
    }

    #[test]
    fn test_fnv_hashes_utf16_units() {
        // "é" is one UTF-16 unit (0xE9), "𝄞" is a surrogate pair.
        assert_eq!(fnv1a_utf16("é"), (FNV_OFFSET_BASIS ^ 0xE9).wrapping_mul(FNV_PRIME));
        let pair = (FNV_OFFSET_BASIS ^ 0xD834).wrapping_mul(FNV_PRIME);
        assert_eq!(fnv1a_utf16("𝄞"), (pair ^ 0xDD1E).wrapping_mul(FNV_PRIME));
    }

    #[test]
    fn test_notes_follow_index_formula() {
        let settings = MelodySettings::default();
        let text = "In the beginning God created the heaven and the earth.";
        let seed = u64::from(melody_seed(text, &settings));
        let notes = generate_melody(text, &settings);

        assert_eq!(notes.len(), 10);
        for (i, note) in notes.iter().enumerate() {
            let len = note.word.encode_utf16().count() as u64;
            let index = (seed + i as u64 * 31 + len * 13) % 21;
            let degree = [0, 2, 4, 5, 7, 9, 11][(index % 7) as usize];
            let octave = 3 + (index / 7) as i32;
            assert_eq!(note.midi, 12 * (octave + 1) + degree, "word {}", i);
        }
    }

    #[test]
    fn test_word_duration() {
        assert!((word_duration("a") - 0.21).abs() < 1e-9);
        assert!((word_duration("God") - 0.27).abs() < 1e-9);
        assert!((word_duration("earth.") - 0.56).abs() < 1e-9);
        assert!((word_duration("unsearchable") - 0.54).abs() < 1e-9);
        assert!((word_duration("Mahershalalhashbaz") - 0.72).abs() < 1e-9);
        assert_eq!(word_duration("Mahershalalhashbaz,"), MAX_NOTE_DURATION);
        assert!((word_duration("Amen!") - 0.53).abs() < 1e-9);
    }

    #[test]
    fn test_astral_words_measured_in_utf16_units() {
        let text = "Sing \u{1D11E}\u{1D11E}\u{1D11E}\u{1D11E} now";
        let notes = generate_melody(text, &MelodySettings::default());
        let pitches: Vec<i32> = notes.iter().map(|n| n.midi).collect();
        assert_eq!(pitches, vec![53, 52, 65]);
        assert!((notes[1].duration - 0.42).abs() < 1e-9);
        assert!((word_duration("\u{1D11E}") - 0.24).abs() < 1e-9);
    }

    #[test]
    fn test_words_split_on_ecmascript_whitespace() {
        let words: Vec<&str> = split_words("a\u{FEFF}b c\u{85}d\u{3000}e").collect();
        assert_eq!(words, vec!["a", "b", "c\u{85}d", "e"]);

        let notes = generate_melody("a\u{FEFF}b c\u{85}d", &MelodySettings::default());
        let notes: Vec<(&str, i32)> = notes.iter().map(|n| (n.word.as_str(), n.midi)).collect();
        assert_eq!(notes, vec![("a", 77), ("b", 59), ("c\u{85}d", 48)]);
    }

    #[test]
    fn test_whitespace_only_text_is_silent() {
        assert!(generate_melody("", &MelodySettings::default()).is_empty());
        assert!(generate_melody(" \t\n ", &MelodySettings::default()).is_empty());
    }

    #[test]
    fn test_inverted_octaves_collapse_to_one() {
        let settings = MelodySettings {
            low_octave: 5,
            high_octave: 2,
            ..MelodySettings::default()
        };
        assert_eq!(settings.octave_span(), 1);
        for note in generate_melody("And God said, Let there be light", &settings) {
            assert!((72..=83).contains(&note.midi));
        }
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_pitch_range_and_validate() {
        let settings = MelodySettings::default();
        assert_eq!(settings.pitch_range(), (48, 83));
        assert!(settings.validate().is_ok());

        let too_high = MelodySettings {
            key: Key::B,
            low_octave: 8,
            high_octave: 9,
            ..MelodySettings::default()
        };
        assert!(too_high.validate().is_err());

        let too_low = MelodySettings {
            low_octave: -2,
            high_octave: 0,
            ..MelodySettings::default()
        };
        assert!(too_low.validate().is_err());
    }
}
