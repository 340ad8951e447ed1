//! Offline rendering of schedules to WAV audio.
//!
//! Each note is a triangle wave shaped by an ADSR envelope, mixed into a
//! mono buffer and written as 16-bit PCM. Rendering uses no randomness and
//! writes no timestamps, so identical schedules produce identical bytes.

use std::f64::consts::PI;
use std::io::Cursor;

use crate::envelope::AdsrParams;
use crate::error::MelodyError;
use crate::note::midi_to_freq;
use crate::playback::Schedule;

/// Default sample rate for rendered audio.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Headroom applied to the mix so overlapping release tails rarely clip.
const MIX_HEADROOM: f64 = 0.5;

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Linear volume, 0.0 to 1.0.
    pub volume: f64,
    /// Amplitude envelope of each note.
    pub envelope: AdsrParams,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            volume: 0.7,
            envelope: AdsrParams::default(),
        }
    }
}

/// Result of rendering.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Encoded file bytes.
    pub data: Vec<u8>,
    /// BLAKE3 hash of `data`.
    pub hash: String,
    /// File extension ("wav" or "mid").
    pub extension: &'static str,
}

impl RenderResult {
    pub(crate) fn new(data: Vec<u8>, extension: &'static str) -> Self {
        let hash = blake3::hash(&data).to_hex().to_string();
        Self {
            data,
            hash,
            extension,
        }
    }
}

/// Phase accumulator for a single oscillator.
struct PhaseAccumulator {
    phase: f64,
    sample_rate: f64,
}

impl PhaseAccumulator {
    fn new(sample_rate: f64) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
        }
    }

    /// Returns the current phase in [0, 2π) and advances by one sample.
    fn advance(&mut self, freq: f64) -> f64 {
        let current = self.phase;
        self.phase += 2.0 * PI * freq / self.sample_rate;
        if self.phase >= 2.0 * PI {
            self.phase -= 2.0 * PI;
        }
        current
    }
}

/// Triangle wave in [-1, 1] for a phase in [0, 2π).
fn triangle(phase: f64) -> f64 {
    let t = phase / (2.0 * PI);
    if t < 0.25 {
        4.0 * t
    } else if t < 0.75 {
        2.0 - 4.0 * t
    } else {
        4.0 * t - 4.0
    }
}

/// Mixes a schedule into mono samples in [-1, 1].
///
/// The buffer runs until the last release tail has died away or the
/// schedule's completion time, whichever is later.
pub fn render_samples(schedule: &Schedule, options: &RenderOptions) -> Result<Vec<f64>, MelodyError> {
    if options.sample_rate == 0 {
        return Err(MelodyError::InvalidParameter(
            "sample_rate must be positive".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&options.volume) {
        return Err(MelodyError::InvalidParameter(format!(
            "volume must be 0.0-1.0, got {}",
            options.volume
        )));
    }

    let sr = options.sample_rate as f64;
    let gain = options.volume * MIX_HEADROOM;
    let mut buffer = vec![0.0; (schedule.end * sr).ceil() as usize];

    for note in &schedule.notes {
        let freq = midi_to_freq(note.midi);
        let curve = options.envelope.note_curve(sr, note.duration);
        let offset = (note.start * sr).round() as usize;

        if buffer.len() < offset + curve.len() {
            buffer.resize(offset + curve.len(), 0.0);
        }

        let mut osc = PhaseAccumulator::new(sr);
        for (i, amp) in curve.iter().enumerate() {
            buffer[offset + i] += triangle(osc.advance(freq)) * amp * gain;
        }
    }

    for sample in buffer.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
    Ok(buffer)
}

/// Renders a schedule to a 16-bit mono WAV file in memory.
pub fn render_wav(schedule: &Schedule, options: &RenderOptions) -> Result<RenderResult, MelodyError> {
    let samples = render_samples(schedule, options)?;

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: options.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in &samples {
            writer.write_sample((sample * i16::MAX as f64).round() as i16)?;
        }
        writer.finalize()?;
    }

    Ok(RenderResult::new(cursor.into_inner(), "wav"))
}
