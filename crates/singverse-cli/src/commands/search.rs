//! Search command implementation
//!
//! A query that parses as a reference jumps to it (verse 1 when only a
//! chapter is named); anything else is a case-insensitive text search.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use singverse_bible::{
    format_reference, lookup, make_snippet, BibleData, SearchIndex, SearchOutcome, Selection,
};
use std::process::ExitCode;

use super::{verse_target, Reader};

/// JSON description of where a reference query lands.
fn reference_json(data: &BibleData, selection: &Selection) -> Result<serde_json::Value> {
    let (landing, verse) = verse_target(data, selection)?;
    Ok(json!({
        "kind": "reference",
        "reference": format_reference(data, &landing),
        "route": landing.to_route(),
        "selection": landing,
        "text": verse.t,
    }))
}

/// Run the search command
pub fn run(query: &str, limit: usize, json: bool) -> Result<ExitCode> {
    let reader = Reader::open()?;
    let index = SearchIndex::build(&reader.data);
    let outcome = lookup(query, &reader.data, &index, limit);
    tracing::debug!(query, indexed = index.len(), "search");

    match outcome {
        SearchOutcome::Reference(selection) => {
            if json {
                let output = reference_json(&reader.data, &selection)?;
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let (landing, verse) = verse_target(&reader.data, &selection)?;
                println!(
                    "{} {}",
                    "Reference:".cyan().bold(),
                    format_reference(&reader.data, &landing)
                );
                println!("  {}: {}", "Route".dimmed(), landing.to_route());
                println!("  {}", verse.t);
            }
        }
        SearchOutcome::Hits(hits) => {
            if json {
                let hits: Vec<_> = hits
                    .iter()
                    .map(|h| {
                        json!({
                            "book_id": h.book_id,
                            "book": h.book,
                            "chapter": h.chapter,
                            "verse": h.verse,
                            "route": h.selection().to_route(),
                            "snippet": make_snippet(&h.text, query),
                        })
                    })
                    .collect();
                let output = json!({ "kind": "hits", "query": query, "hits": hits });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if hits.is_empty() {
                println!("{} {}", "No matches for".yellow(), query);
            } else {
                println!(
                    "{} {} {}",
                    "Found".cyan().bold(),
                    hits.len(),
                    if hits.len() == 1 { "match" } else { "matches" }
                );
                for hit in &hits {
                    println!(
                        "  {} - {}",
                        format!("{} {}:{}", hit.book, hit.chapter, hit.verse).bold(),
                        make_snippet(&hit.text, query)
                    );
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use singverse_bible::{Book, Chapter, Verse};

    fn data() -> BibleData {
        let verses = [
            "In the beginning was the Word.",
            "The same was in the beginning with God.",
        ];
        BibleData {
            books: vec![Book {
                id: "john".to_string(),
                name: "John".to_string(),
                chapters: vec![Chapter {
                    verses: verses
                        .iter()
                        .enumerate()
                        .map(|(i, t)| Verse {
                            n: i as u32 + 1,
                            t: t.to_string(),
                        })
                        .collect(),
                }],
            }],
            order: vec!["john".to_string()],
        }
    }

    #[test]
    fn test_chapter_reference_lands_on_first_verse() {
        let data = data();
        let index = SearchIndex::build(&data);
        let selection = match lookup("John 1", &data, &index, 25) {
            SearchOutcome::Reference(selection) => selection,
            other => panic!("expected reference, got {:?}", other),
        };
        assert_eq!(selection.verse, None);

        let output = reference_json(&data, &selection).unwrap();
        assert_eq!(output["route"], "/v/john/1/1");
        assert_eq!(output["reference"], "John 1:1");
        assert_eq!(output["text"], "In the beginning was the Word.");
    }

    #[test]
    fn test_verse_reference_keeps_verse() {
        let data = data();
        let output = reference_json(&data, &Selection::verse("john", 1, 2)).unwrap();
        assert_eq!(output["route"], "/v/john/1/2");
        assert_eq!(output["text"], "The same was in the beginning with God.");
    }
}
