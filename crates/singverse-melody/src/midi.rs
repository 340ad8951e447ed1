//! Standard MIDI File output for schedules.
//!
//! A schedule becomes a single-track SMF at 120 BPM, one note-on/note-off
//! pair per scheduled word, so a verse can be opened in any sequencer.

use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};

use crate::error::MelodyError;
use crate::note::to_midi_byte;
use crate::playback::Schedule;
use crate::render::RenderResult;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Tempo of the output file.
const TEMPO_BPM: u32 = 120;

/// Ticks per second at [`TEMPO_BPM`].
const TICKS_PER_SECOND: f64 = TICKS_PER_QUARTER as f64 * TEMPO_BPM as f64 / 60.0;

/// General MIDI program for the melody (Acoustic Guitar, nylon).
const PROGRAM: u8 = 24;

const CHANNEL: u8 = 0;

fn seconds_to_ticks(seconds: f64) -> u32 {
    (seconds.max(0.0) * TICKS_PER_SECOND).round() as u32
}

/// Velocity for a linear volume.
fn velocity(volume: f64) -> u8 {
    (volume.clamp(0.0, 1.0) * 127.0).round() as u8
}

/// Renders a schedule to a Standard MIDI File.
///
/// Fails with [`MelodyError::PitchOutOfRange`] if a note cannot be expressed
/// as a MIDI key.
pub fn render_midi(schedule: &Schedule, volume: f64) -> Result<RenderResult, MelodyError> {
    let smf = schedule_to_smf(schedule, volume)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(RenderResult::new(buf, "mid"))
}

fn schedule_to_smf(schedule: &Schedule, volume: f64) -> Result<Smf<'static>, MelodyError> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let channel = u4::new(CHANNEL);
    let vel = u7::new(velocity(volume));

    // (tick, is_note_on, key). Offs sort before ons at the same tick.
    let mut events: Vec<(u32, bool, u8)> = Vec::with_capacity(schedule.notes.len() * 2);
    for note in &schedule.notes {
        let key = to_midi_byte(note.midi).ok_or(MelodyError::PitchOutOfRange(note.midi))?;
        let on = seconds_to_ticks(note.start);
        let off = seconds_to_ticks(note.start + note.duration).max(on + 1);
        events.push((on, true, key));
        events.push((off, false, key));
    }
    events.sort_by_key(|(tick, is_on, _)| (*tick, *is_on));

    let mut track: Track<'static> = Vec::new();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(60_000_000 / TEMPO_BPM))),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(PROGRAM),
            },
        },
    });

    let mut last_tick = 0;
    for (tick, is_on, key) in events {
        let message = if is_on {
            MidiMessage::NoteOn {
                key: u7::new(key),
                vel,
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(0),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    let end_tick = seconds_to_ticks(schedule.end).max(last_tick);
    track.push(TrackEvent {
        delta: u28::new(end_tick - last_tick),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    smf.tracks.push(track);
    Ok(smf)
}
