//! Playback settings, note schedules, and speech plans.
//!
//! A [`Schedule`] is the tempo-scaled timeline the reader plays: notes back
//! to back, followed by a short completion marker at which the word highlight
//! clears and auto-advance fires. Voice mode plays a [`SpeechPlan`] instead.

use serde::{Deserialize, Serialize};

use crate::error::MelodyError;
use crate::generate::MelodyNote;

/// Slowest supported tempo multiplier.
pub const MIN_TEMPO: f64 = 0.5;
/// Fastest supported tempo multiplier.
pub const MAX_TEMPO: f64 = 1.8;
/// Delay after the last note before playback counts as finished, in seconds.
pub const COMPLETION_DELAY: f64 = 0.05;

/// Speech rate at tempo 1.0.
const BASE_SPEECH_RATE: f64 = 0.95;
/// Speech pitch multiplier.
const SPEECH_PITCH: f64 = 1.1;
/// Gain floor used before converting to decibels.
const MIN_GAIN: f64 = 0.0001;

/// How a verse is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// Generated melody, one note per word.
    #[default]
    Melody,
    /// Speech synthesis of the verse text.
    Voice,
}

/// Reader playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub mode: PlaybackMode,
    /// Tempo multiplier; note lengths are divided by it.
    pub tempo: f64,
    /// Linear volume, 0.0 to 1.0.
    pub volume: f64,
    /// Continue with the next verse when playback finishes.
    pub auto_advance: bool,
    /// Preferred speech voice name for voice mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            mode: PlaybackMode::Melody,
            tempo: 1.0,
            volume: 0.7,
            auto_advance: false,
            voice: None,
        }
    }
}

impl PlaybackSettings {
    /// Checks tempo and volume ranges.
    pub fn validate(&self) -> Result<(), MelodyError> {
        validate_tempo(self.tempo)?;
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(MelodyError::InvalidParameter(format!(
                "volume must be 0.0-1.0, got {}",
                self.volume
            )));
        }
        Ok(())
    }
}

fn validate_tempo(tempo: f64) -> Result<(), MelodyError> {
    if !(MIN_TEMPO..=MAX_TEMPO).contains(&tempo) {
        return Err(MelodyError::InvalidParameter(format!(
            "tempo must be {}-{}, got {}",
            MIN_TEMPO, MAX_TEMPO, tempo
        )));
    }
    Ok(())
}

/// Converts a linear gain to decibels, flooring silence at -80 dB.
///
/// ```
/// use singverse_melody::playback::gain_to_db;
///
/// assert!((gain_to_db(1.0)).abs() < 1e-9);
/// assert!((gain_to_db(0.0) + 80.0).abs() < 1e-9);
/// ```
pub fn gain_to_db(volume: f64) -> f64 {
    20.0 * volume.max(MIN_GAIN).log10()
}

/// A note placed on the playback timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNote {
    /// Word position within its verse.
    pub index: usize,
    pub word: String,
    pub midi: i32,
    /// Start time in seconds.
    pub start: f64,
    /// Length in seconds after tempo scaling.
    pub duration: f64,
}

/// Tempo-scaled timeline of notes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub notes: Vec<ScheduledNote>,
    /// Completion time: end of the last note plus [`COMPLETION_DELAY`].
    pub end: f64,
}

impl Schedule {
    /// Lays notes back to back, each lasting `duration / tempo`.
    ///
    /// # Examples
    /// ```
    /// use singverse_melody::{generate_melody, MelodySettings, Schedule};
    ///
    /// let notes = generate_melody("Jesus wept.", &MelodySettings::default());
    /// let schedule = Schedule::build(&notes, 1.0).unwrap();
    /// assert_eq!(schedule.notes[1].start, notes[0].duration);
    /// ```
    pub fn build(notes: &[MelodyNote], tempo: f64) -> Result<Self, MelodyError> {
        validate_tempo(tempo)?;

        let mut t = 0.0;
        let scheduled = notes
            .iter()
            .enumerate()
            .map(|(index, note)| {
                let duration = note.duration / tempo;
                let scheduled = ScheduledNote {
                    index,
                    word: note.word.clone(),
                    midi: note.midi,
                    start: t,
                    duration,
                };
                t += duration;
                scheduled
            })
            .collect();

        Ok(Self {
            notes: scheduled,
            end: t + COMPLETION_DELAY,
        })
    }

    /// Time at which the last note stops sounding.
    pub fn sounding_end(&self) -> f64 {
        self.notes
            .last()
            .map(|n| n.start + n.duration)
            .unwrap_or(0.0)
    }

    /// Index into `notes` of the note sounding at time `t`, if any.
    pub fn active_at(&self, t: f64) -> Option<usize> {
        if t < 0.0 {
            return None;
        }
        self.notes
            .iter()
            .position(|n| t >= n.start && t < n.start + n.duration)
    }

    /// Joins schedules end to end, as auto-advance plays consecutive verses.
    ///
    /// Each schedule starts at the previous one's completion time.
    pub fn concat(schedules: &[Schedule]) -> Schedule {
        let mut notes = Vec::new();
        let mut offset = 0.0;
        for schedule in schedules {
            notes.extend(schedule.notes.iter().map(|n| ScheduledNote {
                start: n.start + offset,
                ..n.clone()
            }));
            offset += schedule.end;
        }
        Schedule { notes, end: offset }
    }
}

/// Parameters of a speech utterance for voice mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechPlan {
    pub text: String,
    /// Speaking rate multiplier.
    pub rate: f64,
    /// Pitch multiplier.
    pub pitch: f64,
    /// Linear volume, 0.0 to 1.0.
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl SpeechPlan {
    /// Builds the utterance for a verse.
    pub fn new(text: impl Into<String>, settings: &PlaybackSettings) -> Self {
        Self {
            text: text.into(),
            rate: BASE_SPEECH_RATE * settings.tempo,
            pitch: SPEECH_PITCH,
            volume: settings.volume,
            voice: settings.voice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn note(word: &str, midi: i32, duration: f64) -> MelodyNote {
        MelodyNote {
            word: word.to_string(),
            midi,
            duration,
        }
    }

    #[test]
    fn test_schedule_scales_by_tempo() {
        let notes = vec![note("Jesus", 60, 0.5), note("wept.", 64, 0.6)];
        let schedule = Schedule::build(&notes, 1.25).unwrap();

        assert_eq!(schedule.notes.len(), 2);
        assert_eq!(schedule.notes[0].start, 0.0);
        assert!((schedule.notes[0].duration - 0.4).abs() < 1e-9);
        assert!((schedule.notes[1].start - 0.4).abs() < 1e-9);
        assert!((schedule.notes[1].duration - 0.48).abs() < 1e-9);
        assert!((schedule.sounding_end() - 0.88).abs() < 1e-9);
        assert!((schedule.end - 0.93).abs() < 1e-9);
    }

    #[test]
    fn test_schedule_rejects_bad_tempo() {
        let notes = vec![note("a", 60, 0.2)];
        assert!(Schedule::build(&notes, 0.0).is_err());
        assert!(Schedule::build(&notes, 2.0).is_err());
        assert!(Schedule::build(&notes, f64::NAN).is_err());
    }

    #[test]
    fn test_empty_schedule_still_completes() {
        let schedule = Schedule::build(&[], 1.0).unwrap();
        assert!(schedule.notes.is_empty());
        assert_eq!(schedule.end, COMPLETION_DELAY);
        assert_eq!(schedule.active_at(0.0), None);
    }

    #[test]
    fn test_active_word() {
        let notes = vec![note("God", 60, 0.3), note("is", 62, 0.2), note("love.", 64, 0.5)];
        let schedule = Schedule::build(&notes, 1.0).unwrap();
        assert_eq!(schedule.active_at(-0.1), None);
        assert_eq!(schedule.active_at(0.0), Some(0));
        assert_eq!(schedule.active_at(0.35), Some(1));
        assert_eq!(schedule.active_at(0.9), Some(2));
        assert_eq!(schedule.active_at(1.01), None);
    }

    #[test]
    fn test_concat_offsets_by_completion() {
        let a = Schedule::build(&[note("a", 60, 0.2)], 1.0).unwrap();
        let b = Schedule::build(&[note("b", 62, 0.3)], 1.0).unwrap();
        let joined = Schedule::concat(&[a.clone(), b]);

        assert_eq!(joined.notes.len(), 2);
        assert!((joined.notes[1].start - a.end).abs() < 1e-9);
        assert!((joined.end - (0.25 + 0.35)).abs() < 1e-9);
    }

    #[test]
    fn test_speech_plan() {
        let settings = PlaybackSettings {
            mode: PlaybackMode::Voice,
            tempo: 1.2,
            volume: 0.5,
            voice: Some("Daniel".to_string()),
            ..PlaybackSettings::default()
        };
        let plan = SpeechPlan::new("Jesus wept.", &settings);
        assert!((plan.rate - 1.14).abs() < 1e-9);
        assert_eq!(plan.pitch, 1.1);
        assert_eq!(plan.volume, 0.5);
        assert_eq!(plan.voice.as_deref(), Some("Daniel"));
    }

    #[test]
    fn test_playback_settings_validate() {
        assert!(PlaybackSettings::default().validate().is_ok());
        let loud = PlaybackSettings {
            volume: 1.5,
            ..PlaybackSettings::default()
        };
        assert!(loud.validate().is_err());
    }

    #[test]
    fn test_playback_settings_defaults_from_partial_json() {
        let settings: PlaybackSettings = serde_json::from_str(r#"{"tempo": 1.5}"#).unwrap();
        assert_eq!(settings.tempo, 1.5);
        assert_eq!(settings.volume, 0.7);
        assert_eq!(settings.mode, PlaybackMode::Melody);
    }
}
