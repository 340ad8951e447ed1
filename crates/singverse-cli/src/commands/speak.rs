//! Speak command implementation
//!
//! Prints the speech utterance voice mode would play for a verse.

use anyhow::Result;
use colored::Colorize;
use singverse_bible::format_reference;
use singverse_melody::{gain_to_db, SpeechPlan};
use std::process::ExitCode;

use super::{resolve_target, verse_target, MelodyArgs, Reader};

/// Run the speak command
pub fn run(target: &str, args: &MelodyArgs, voice: Option<&str>, json: bool) -> Result<ExitCode> {
    let reader = Reader::open()?;
    let (_, mut playback) = args.apply(&reader.config)?;
    if let Some(voice) = voice {
        playback.voice = Some(voice.to_string());
    }
    let selection = resolve_target(&reader.data, target)?;
    let (selection, verse) = verse_target(&reader.data, &selection)?;
    let plan = SpeechPlan::new(verse.t.clone(), &playback);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {}",
        format_reference(&reader.data, &selection).cyan().bold(),
        plan.text
    );
    println!("  {}: {:.3}", "Rate".dimmed(), plan.rate);
    println!("  {}: {:.2}", "Pitch".dimmed(), plan.pitch);
    println!(
        "  {}: {:.2} ({:.1} dB)",
        "Volume".dimmed(),
        plan.volume,
        gain_to_db(plan.volume)
    );
    println!(
        "  {}: {}",
        "Voice".dimmed(),
        plan.voice.as_deref().unwrap_or("system default")
    );
    Ok(ExitCode::SUCCESS)
}
