//! Normalize command implementation
//!
//! Converts a raw scrollmapper JSON file into the reader's `kjv.json` form.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::process::ExitCode;

use crate::source::ingest;

/// Run the normalize command
pub fn run(input: &str, output: &str, json: bool) -> Result<ExitCode> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("Failed to read raw source: {}", input))?;
    let (data, warnings) = ingest(&raw)?;

    let normalized = data.to_json()?;
    fs::write(output, &normalized).with_context(|| format!("Failed to write {}", output))?;
    let hash = blake3::hash(normalized.as_bytes()).to_hex().to_string();

    if json {
        let result = serde_json::json!({
            "success": true,
            "output": output,
            "books": data.books.len(),
            "verses": data.verse_count(),
            "hash": hash,
            "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Normalizing:".cyan().bold(), input);
    for warning in &warnings {
        println!("  {} {}", "WARN".yellow().bold(), warning);
    }
    println!(
        "  {} {} books, {} verses -> {}",
        "SUCCESS".green().bold(),
        data.books.len(),
        data.verse_count(),
        output
    );
    println!("  {}: {}", "Hash".dimmed(), hash);
    Ok(ExitCode::SUCCESS)
}
