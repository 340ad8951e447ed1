//! Full-text search and result snippets.

use serde::{Deserialize, Serialize};

use crate::model::{BibleData, Selection};
use crate::reference::parse_reference;

/// Default maximum number of text hits returned by a search.
pub const DEFAULT_SEARCH_LIMIT: usize = 25;

/// Queries shorter than this (in UTF-16 code units) produce no text hits.
pub const MIN_QUERY_CHARS: usize = 2;

/// Characters of context kept before the match in a snippet.
const SNIPPET_LEAD: usize = 30;
/// Snippet window length in characters.
const SNIPPET_WINDOW: usize = 120;
/// Prefix length used when the query does not occur in the text.
const SNIPPET_FALLBACK: usize = 110;

/// A verse matching a text search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub book_id: String,
    /// Display name of the book.
    pub book: String,
    pub chapter: u32,
    /// Printed verse number.
    pub verse: u32,
    pub text: String,
}

impl SearchHit {
    /// Returns the selection this hit navigates to.
    pub fn selection(&self) -> Selection {
        Selection::verse(self.book_id.clone(), self.chapter, self.verse)
    }
}

/// Flattened, pre-lowercased verse index in canonical order.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchHit>,
    lowered: Vec<String>,
}

impl SearchIndex {
    /// Builds the index from every verse in the data.
    pub fn build(data: &BibleData) -> Self {
        let mut entries = Vec::with_capacity(data.verse_count());
        for book in &data.books {
            for (ci, chapter) in book.chapters.iter().enumerate() {
                for verse in &chapter.verses {
                    entries.push(SearchHit {
                        book_id: book.id.clone(),
                        book: book.name.clone(),
                        chapter: ci as u32 + 1,
                        verse: verse.n,
                        text: verse.t.clone(),
                    });
                }
            }
        }
        let lowered = entries.iter().map(|e| e.text.to_lowercase()).collect();
        Self { entries, lowered }
    }

    /// Number of indexed verses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive substring search, first `limit` hits in canonical order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let needle = query.to_lowercase();
        self.lowered
            .iter()
            .zip(&self.entries)
            .filter(|(text, _)| text.contains(&needle))
            .map(|(_, hit)| hit.clone())
            .take(limit)
            .collect()
    }
}

/// Result of interpreting a search box query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query is a valid reference; navigate there.
    Reference(Selection),
    /// Text hits (possibly empty).
    Hits(Vec<SearchHit>),
}

/// Interprets a query: a reference jump if it parses, else a text search.
///
/// Queries shorter than [`MIN_QUERY_CHARS`] UTF-16 code units that are not
/// references yield no hits.
pub fn lookup(query: &str, data: &BibleData, index: &SearchIndex, limit: usize) -> SearchOutcome {
    if let Some(selection) = parse_reference(query, data) {
        return SearchOutcome::Reference(selection);
    }
    if query.encode_utf16().count() < MIN_QUERY_CHARS {
        return SearchOutcome::Hits(Vec::new());
    }
    SearchOutcome::Hits(index.search(query, limit))
}

/// Builds a display snippet of `text` around the first match of `query`.
///
/// Indices are in characters. When the query is absent the first 110
/// characters are returned unadorned; otherwise a 120 character window
/// starting 30 characters before the match, with `…` marking cut ends.
///
/// # Example
/// ```
/// use singverse_bible::make_snippet;
///
/// assert_eq!(make_snippet("Jesus wept.", "WEPT"), "Jesus wept.");
/// ```
pub fn make_snippet(text: &str, query: &str) -> String {
    let chars: Vec<char> = text.chars().collect();

    let Some(idx) = find_case_insensitive(&chars, query) else {
        return chars.iter().take(SNIPPET_FALLBACK).collect();
    };

    let start = idx.saturating_sub(SNIPPET_LEAD);
    let end = (start + SNIPPET_WINDOW).min(chars.len());

    let mut snippet = String::with_capacity(end - start + 8);
    if start > 0 {
        snippet.push('…');
    }
    snippet.extend(&chars[start..end]);
    if chars.len() > start + SNIPPET_WINDOW {
        snippet.push('…');
    }
    snippet
}

/// Finds the character index in `text` of the first case-insensitive match.
fn find_case_insensitive(text: &[char], query: &str) -> Option<usize> {
    let needle: Vec<char> = query.to_lowercase().chars().collect();
    if needle.is_empty() {
        return Some(0);
    }

    // Lowercasing can expand a character, so keep a map back to the original.
    let mut lowered = Vec::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());
    for (i, c) in text.iter().enumerate() {
        for lc in c.to_lowercase() {
            lowered.push(lc);
            origin.push(i);
        }
    }

    if needle.len() > lowered.len() {
        return None;
    }
    lowered
        .windows(needle.len())
        .position(|w| w == needle.as_slice())
        .map(|p| origin[p])
}
