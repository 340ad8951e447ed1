//! Books command implementation

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use super::Reader;

#[derive(Serialize)]
struct BookEntry<'a> {
    id: &'a str,
    name: &'a str,
    chapters: usize,
}

/// List books with their chapter counts
pub fn run(json: bool) -> Result<ExitCode> {
    let reader = Reader::open()?;
    let entries: Vec<BookEntry> = reader
        .data
        .books
        .iter()
        .map(|b| BookEntry {
            id: &b.id,
            name: &b.name,
            chapters: b.chapter_count(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Books".cyan().bold());
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in &entries {
        println!(
            "  {:<width$}  {:>3} {}  {}",
            entry.name,
            entry.chapters,
            if entry.chapters == 1 { "chapter " } else { "chapters" },
            format!("/b/{}/1", entry.id).dimmed(),
            width = width
        );
    }
    Ok(ExitCode::SUCCESS)
}
