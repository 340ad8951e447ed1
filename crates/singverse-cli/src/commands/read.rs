//! Read command implementation
//!
//! Shows a chapter or a single verse and records it as the last position.

use anyhow::{anyhow, Result};
use colored::Colorize;
use serde_json::json;
use singverse_bible::{format_reference, BibleData, Selection, Verse};
use std::process::ExitCode;

use super::{resolve_target, Reader};
use crate::state::ReaderState;

/// Verses shown for a selection: the whole chapter, or just the chosen verse.
pub fn selected_verses<'a>(data: &'a BibleData, selection: &Selection) -> Result<Vec<&'a Verse>> {
    let chapter = data
        .chapter(&selection.book_id, selection.chapter)
        .ok_or_else(|| anyhow!("{} does not exist", selection.to_route()))?;
    Ok(match selection.verse {
        Some(_) => data.verse(selection).into_iter().collect(),
        None => chapter.verses.iter().collect(),
    })
}

/// Run the read command
pub fn run(target: &str, json: bool) -> Result<ExitCode> {
    let reader = Reader::open()?;
    show(&reader, target, json)
}

/// Shows a position from an already opened reader.
pub(crate) fn show(reader: &Reader, target: &str, json: bool) -> Result<ExitCode> {
    let selection = resolve_target(&reader.data, target)?;
    let verses = selected_verses(&reader.data, &selection)?;
    let reference = format_reference(&reader.data, &selection);
    let route = selection.to_route();

    if let Err(err) = ReaderState::new(&route).save(&reader.cache.state_path()) {
        tracing::warn!(error = %err, "could not record last position");
    }

    if json {
        let output = json!({
            "reference": reference,
            "route": route,
            "selection": selection,
            "verses": verses,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", reference.cyan().bold(), route.dimmed());
    for verse in verses {
        println!("  {} {}", format!("{:>3}", verse.n).dimmed(), verse.t);
    }
    if let Some(next) = selection.next_verse(&reader.data) {
        println!("  {} {}", "next:".dimmed(), next.to_route().dimmed());
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use singverse_bible::{Book, Chapter};

    fn data() -> BibleData {
        BibleData {
            books: vec![Book {
                id: "john".to_string(),
                name: "John".to_string(),
                chapters: vec![Chapter {
                    verses: vec![
                        Verse {
                            n: 1,
                            t: "In the beginning was the Word".to_string(),
                        },
                        Verse {
                            n: 2,
                            t: "The same was in the beginning with God.".to_string(),
                        },
                    ],
                }],
            }],
            order: vec!["john".to_string()],
        }
    }

    #[test]
    fn test_chapter_shows_all_verses() {
        let data = data();
        let verses = selected_verses(&data, &Selection::chapter("john", 1)).unwrap();
        assert_eq!(verses.len(), 2);
    }

    #[test]
    fn test_verse_shows_one() {
        let data = data();
        let verses = selected_verses(&data, &Selection::verse("john", 1, 2)).unwrap();
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].n, 2);
    }

    #[test]
    fn test_missing_chapter_is_an_error() {
        assert!(selected_verses(&data(), &Selection::chapter("john", 2)).is_err());
    }
}
