//! Keys (pitch classes) and scales.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MelodyError;

/// One of the twelve pitch classes, used as the melody's tonic.
///
/// Serializes with sharp spellings ("C#"); flat spellings are accepted on
/// input as enharmonic aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Key {
    #[default]
    C,
    #[serde(rename = "C#", alias = "Db")]
    CSharp,
    D,
    #[serde(rename = "D#", alias = "Eb")]
    DSharp,
    E,
    F,
    #[serde(rename = "F#", alias = "Gb")]
    FSharp,
    G,
    #[serde(rename = "G#", alias = "Ab")]
    GSharp,
    A,
    #[serde(rename = "A#", alias = "Bb")]
    ASharp,
    B,
}

impl Key {
    /// All keys in semitone order.
    pub const ALL: [Key; 12] = [
        Key::C,
        Key::CSharp,
        Key::D,
        Key::DSharp,
        Key::E,
        Key::F,
        Key::FSharp,
        Key::G,
        Key::GSharp,
        Key::A,
        Key::ASharp,
        Key::B,
    ];

    /// Semitone offset above C (0-11).
    pub fn semitone(self) -> u8 {
        self as u8
    }

    /// Returns the key for a semitone offset (taken modulo 12).
    pub fn from_semitone(semitone: u8) -> Key {
        Key::ALL[(semitone % 12) as usize]
    }

    /// Canonical (sharp) spelling.
    pub fn name(self) -> &'static str {
        match self {
            Key::C => "C",
            Key::CSharp => "C#",
            Key::D => "D",
            Key::DSharp => "D#",
            Key::E => "E",
            Key::F => "F",
            Key::FSharp => "F#",
            Key::G => "G",
            Key::GSharp => "G#",
            Key::A => "A",
            Key::ASharp => "A#",
            Key::B => "B",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = MelodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .ok_or_else(|| MelodyError::UnknownKey(s.to_string()))?
            .to_ascii_uppercase();

        let natural: u8 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(MelodyError::UnknownKey(s.to_string())),
        };

        let semitone = match chars.as_str() {
            "" => natural,
            "#" => natural + 1,
            "b" => natural + 11,
            _ => return Err(MelodyError::UnknownKey(s.to_string())),
        };

        Ok(Key::from_semitone(semitone))
    }
}

/// Scale family, each a fixed ordered set of degree offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Major,
    Minor,
    Pentatonic,
}

const MAJOR: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];
const PENTATONIC: [u8; 5] = [0, 2, 4, 7, 9];

impl Scale {
    /// All supported scales.
    pub const ALL: [Scale; 3] = [Scale::Major, Scale::Minor, Scale::Pentatonic];

    /// Semitone offsets of the scale degrees, ascending from the tonic.
    pub fn degrees(self) -> &'static [u8] {
        match self {
            Scale::Major => &MAJOR,
            Scale::Minor => &MINOR,
            Scale::Pentatonic => &PENTATONIC,
        }
    }

    /// Lowercase name as used in settings.
    pub fn name(self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::Pentatonic => "pentatonic",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scale {
    type Err = MelodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(Scale::Major),
            "minor" => Ok(Scale::Minor),
            "pentatonic" => Ok(Scale::Pentatonic),
            _ => Err(MelodyError::UnknownScale(s.to_string())),
        }
    }
}
