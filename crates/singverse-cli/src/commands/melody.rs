//! Melody command implementation
//!
//! Prints the notes generated for a verse and their playback timeline.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use singverse_bible::format_reference;
use singverse_melody::{generate_melody, melody_seed, midi_to_name, Schedule};
use std::process::ExitCode;

use super::{resolve_target, verse_target, MelodyArgs, Reader};

/// Run the melody command
pub fn run(target: &str, args: &MelodyArgs, json: bool) -> Result<ExitCode> {
    let reader = Reader::open()?;
    let (settings, playback) = args.apply(&reader.config)?;
    let selection = resolve_target(&reader.data, target)?;
    let (selection, verse) = verse_target(&reader.data, &selection)?;

    let seed = melody_seed(&verse.t, &settings);
    let notes = generate_melody(&verse.t, &settings);
    let schedule = Schedule::build(&notes, playback.tempo)?;
    let reference = format_reference(&reader.data, &selection);

    if json {
        let output = json!({
            "reference": reference,
            "route": selection.to_route(),
            "seed": seed,
            "settings": settings,
            "tempo": playback.tempo,
            "notes": notes,
            "schedule": schedule,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", reference.cyan().bold(), verse.t);
    println!(
        "  {}: {} {}, octaves {}-{}, tempo {}x, seed {:#010x}",
        "Melody".dimmed(),
        settings.key,
        settings.scale,
        settings.low_octave,
        settings.high_octave,
        playback.tempo,
        seed
    );
    for note in &schedule.notes {
        println!(
            "  {:>7.3}s  {:<4} {:>3}  {:>5.3}s  {}",
            note.start,
            midi_to_name(note.midi),
            note.midi,
            note.duration,
            note.word
        );
    }
    println!("  {}: {:.3}s", "Ends".dimmed(), schedule.end);
    Ok(ExitCode::SUCCESS)
}
