//! Conversion from the raw scrollmapper KJV JSON into [`BibleData`].
//!
//! The raw source looks like:
//!
//! ```text
//! { "translation": "...",
//!   "books": [ { "name": "Genesis",
//!                "chapters": [ { "chapter": 1,
//!                                "verses": [ { "verse": 1, "text": "..." } ] } ] } ] }
//! ```
//!
//! Fields other than book `name`, verse number, and verse text are ignored.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::BibleError;
use crate::model::{BibleData, Book, Chapter, Verse};

static NON_SLUG_REGEX: OnceLock<Regex> = OnceLock::new();

fn non_slug_regex() -> &'static Regex {
    NON_SLUG_REGEX.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("invalid regex pattern"))
}

/// Raw source document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBible {
    pub books: Vec<RawBook>,
}

/// Raw source book.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBook {
    pub name: String,
    pub chapters: Vec<RawChapter>,
}

/// Raw source chapter.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChapter {
    pub verses: Vec<RawVerse>,
}

/// Raw source verse.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVerse {
    pub verse: u32,
    pub text: String,
}

impl RawBible {
    /// Parses the raw source JSON.
    pub fn from_json(json: &str) -> Result<Self, BibleError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Converts a display name into a route slug.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, and strips leading and trailing dashes.
///
/// ```
/// use singverse_bible::normalize::slug;
///
/// assert_eq!(slug("Song of Solomon"), "song-of-solomon");
/// assert_eq!(slug("1 John"), "1-john");
/// assert_eq!(slug("  Acts (of the Apostles) "), "acts-of-the-apostles");
/// ```
pub fn slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    non_slug_regex()
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Normalizes a raw source document.
///
/// Book ids are slugs of the book names; `order` lists them in source order.
pub fn normalize(raw: RawBible) -> BibleData {
    let books: Vec<Book> = raw
        .books
        .into_iter()
        .map(|book| Book {
            id: slug(&book.name),
            name: book.name,
            chapters: book
                .chapters
                .into_iter()
                .map(|chapter| Chapter {
                    verses: chapter
                        .verses
                        .into_iter()
                        .map(|v| Verse {
                            n: v.verse,
                            t: v.text,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let order = books.iter().map(|b| b.id.clone()).collect();
    BibleData { books, order }
}

/// Parses and normalizes raw source JSON in one step.
pub fn normalize_json(json: &str) -> Result<BibleData, BibleError> {
    Ok(normalize(RawBible::from_json(json)?))
}
