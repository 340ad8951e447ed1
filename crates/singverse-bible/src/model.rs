//! Verse data model.
//!
//! The serialized form matches the normalized `kjv.json` file: verses carry
//! their number as `n` and text as `t` to keep the file compact.

use serde::{Deserialize, Serialize};

use crate::error::BibleError;

/// A single verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Verse number as printed in the source.
    pub n: u32,
    /// Verse text.
    pub t: String,
}

/// A chapter: an ordered list of verses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub verses: Vec<Verse>,
}

/// A book with a slug id and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Slug id used in routes (e.g., "1-john").
    pub id: String,
    /// Display name (e.g., "1 John").
    pub name: String,
    pub chapters: Vec<Chapter>,
}

impl Book {
    /// Returns the 1-based chapter, if it exists.
    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.chapters.get(index)
    }

    /// Number of chapters in this book.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }
}

/// The complete verse data set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibleData {
    pub books: Vec<Book>,
    /// Book ids in canonical order.
    pub order: Vec<String>,
}

impl BibleData {
    /// Parses normalized verse data from JSON.
    pub fn from_json(json: &str) -> Result<Self, BibleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to compact JSON.
    pub fn to_json(&self) -> Result<String, BibleError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Looks up a book by slug id.
    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Looks up a book by display name, ignoring case and repeated whitespace.
    pub fn book_by_name(&self, name: &str) -> Option<&Book> {
        let wanted = normalize_book_name(name);
        self.books.iter().find(|b| b.name.to_lowercase() == wanted)
    }

    /// Returns the 1-based chapter of a book.
    pub fn chapter(&self, book_id: &str, number: u32) -> Option<&Chapter> {
        self.book(book_id)?.chapter(number)
    }

    /// Returns the verse addressed by a selection.
    ///
    /// Verses are addressed by 1-based position in the chapter, not by the
    /// printed verse number.
    pub fn verse(&self, selection: &Selection) -> Option<&Verse> {
        let chapter = self.chapter(&selection.book_id, selection.chapter)?;
        let index = usize::try_from(selection.verse?).ok()?.checked_sub(1)?;
        chapter.verses.get(index)
    }

    /// Total number of verses across all books.
    pub fn verse_count(&self) -> usize {
        self.books
            .iter()
            .flat_map(|b| b.chapters.iter())
            .map(|c| c.verses.len())
            .sum()
    }
}

/// Collapses whitespace, trims, and lowercases a book name for comparison.
pub fn normalize_book_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A reader position: a chapter, optionally narrowed to one verse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub book_id: String,
    pub chapter: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<u32>,
}

impl Selection {
    /// Creates a chapter selection.
    pub fn chapter(book_id: impl Into<String>, chapter: u32) -> Self {
        Self {
            book_id: book_id.into(),
            chapter,
            verse: None,
        }
    }

    /// Creates a verse selection.
    pub fn verse(book_id: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book_id: book_id.into(),
            chapter,
            verse: Some(verse),
        }
    }

    /// Returns the following verse in the same chapter.
    ///
    /// Returns `None` when no verse is selected or the selected verse is the
    /// last one in its chapter. Auto-advance never crosses chapter boundaries.
    pub fn next_verse(&self, data: &BibleData) -> Option<Selection> {
        let verse = self.verse?;
        let chapter = data.chapter(&self.book_id, self.chapter)?;
        if (verse as usize) < chapter.verses.len() {
            Some(Selection::verse(self.book_id.clone(), self.chapter, verse + 1))
        } else {
            None
        }
    }
}

/// Formats a selection as a human-readable reference (e.g., "John 3:16").
///
/// Falls back to the book id when the book is unknown.
pub fn format_reference(data: &BibleData, selection: &Selection) -> String {
    let name = data
        .book(&selection.book_id)
        .map(|b| b.name.as_str())
        .unwrap_or(selection.book_id.as_str());
    match selection.verse {
        Some(verse) => format!("{} {}:{}", name, selection.chapter, verse),
        None => format!("{} {}", name, selection.chapter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> BibleData {
        let verses = |n: u32| Chapter {
            verses: (1..=n)
                .map(|i| Verse {
                    n: i,
                    t: format!("verse {}", i),
                })
                .collect(),
        };
        BibleData {
            books: vec![
                Book {
                    id: "genesis".to_string(),
                    name: "Genesis".to_string(),
                    chapters: vec![verses(3), verses(2)],
                },
                Book {
                    id: "song-of-solomon".to_string(),
                    name: "Song of Solomon".to_string(),
                    chapters: vec![verses(4)],
                },
            ],
            order: vec!["genesis".to_string(), "song-of-solomon".to_string()],
        }
    }

    #[test]
    fn test_json_uses_compact_verse_keys() {
        let data = sample();
        let json = data.to_json().unwrap();
        assert!(json.contains(r#"{"n":1,"t":"verse 1"}"#));

        let parsed = BibleData::from_json(&json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_book_lookup() {
        let data = sample();
        assert_eq!(data.book("genesis").unwrap().name, "Genesis");
        assert!(data.book("Genesis").is_none());
        assert_eq!(
            data.book_by_name("  song   OF solomon ").unwrap().id,
            "song-of-solomon"
        );
        assert!(data.book_by_name("exodus").is_none());
    }

    #[test]
    fn test_chapter_and_verse_are_one_based() {
        let data = sample();
        assert!(data.chapter("genesis", 0).is_none());
        assert_eq!(data.chapter("genesis", 2).unwrap().verses.len(), 2);
        assert!(data.chapter("genesis", 3).is_none());

        let v = data.verse(&Selection::verse("genesis", 1, 3)).unwrap();
        assert_eq!(v.t, "verse 3");
        assert!(data.verse(&Selection::verse("genesis", 1, 0)).is_none());
        assert!(data.verse(&Selection::chapter("genesis", 1)).is_none());
    }

    #[test]
    fn test_next_verse_stays_in_chapter() {
        let data = sample();
        assert_eq!(
            Selection::verse("genesis", 1, 2).next_verse(&data),
            Some(Selection::verse("genesis", 1, 3))
        );
        assert_eq!(Selection::verse("genesis", 1, 3).next_verse(&data), None);
        assert_eq!(Selection::chapter("genesis", 1).next_verse(&data), None);
    }

    #[test]
    fn test_format_reference() {
        let data = sample();
        assert_eq!(
            format_reference(&data, &Selection::verse("song-of-solomon", 1, 4)),
            "Song of Solomon 1:4"
        );
        assert_eq!(
            format_reference(&data, &Selection::chapter("genesis", 2)),
            "Genesis 2"
        );
        assert_eq!(
            format_reference(&data, &Selection::chapter("tobit", 1)),
            "tobit 1"
        );
    }

    #[test]
    fn test_verse_count() {
        assert_eq!(sample().verse_count(), 9);
    }
}
