//! MIDI note and frequency conversion utilities.

/// Lowest valid MIDI note.
pub const MIDI_MIN: u8 = 0;
/// Highest valid MIDI note.
pub const MIDI_MAX: u8 = 127;

/// Note names within an octave, sharp spellings.
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Convert a MIDI note number to frequency in Hz.
///
/// Uses the standard formula: f = 440 * 2^((n-69)/12)
/// where n is the MIDI note number and 69 is A4.
///
/// # Examples
/// ```
/// use singverse_melody::note::midi_to_freq;
///
/// let a4 = midi_to_freq(69);
/// assert!((a4 - 440.0).abs() < 0.001);
///
/// let c4 = midi_to_freq(60);
/// assert!((c4 - 261.626).abs() < 0.01);
/// ```
pub fn midi_to_freq(midi_note: i32) -> f64 {
    440.0 * 2.0_f64.powf((midi_note as f64 - 69.0) / 12.0)
}

/// Convert a MIDI note number to a note name (e.g., 60 -> "C4", 61 -> "C#4").
///
/// Octaves follow the MIDI convention where note 0 is "C-1".
///
/// # Examples
/// ```
/// use singverse_melody::note::midi_to_name;
///
/// assert_eq!(midi_to_name(60), "C4");
/// assert_eq!(midi_to_name(70), "A#4");
/// assert_eq!(midi_to_name(0), "C-1");
/// ```
pub fn midi_to_name(midi_note: i32) -> String {
    let octave = midi_note.div_euclid(12) - 1;
    let name = NOTE_NAMES[midi_note.rem_euclid(12) as usize];
    format!("{}{}", name, octave)
}

/// Returns the note as a MIDI byte if it is within 0-127.
pub fn to_midi_byte(midi_note: i32) -> Option<u8> {
    u8::try_from(midi_note).ok().filter(|n| *n <= MIDI_MAX)
}
