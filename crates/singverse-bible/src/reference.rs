//! Reference parsing and reader routes.
//!
//! A reference is free text of the form `<book name> <chapter>[:<verse>]`,
//! e.g. "John 3:16" or "1 John 4". A route is the path form used to persist
//! reader positions: `/b/<book-id>/<chapter>` or `/v/<book-id>/<chapter>/<verse>`.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{normalize_book_name, BibleData, Selection};

/// Pattern for free-text references.
const REFERENCE_PATTERN: &str = r"^([1-3]?\s?[A-Za-z ]+)\s+(\d+)(?::(\d+))?$";

/// Route the reader opens when nothing else is known.
pub const DEFAULT_ROUTE: &str = "/b/genesis/1";

static REFERENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn reference_regex() -> &'static Regex {
    REFERENCE_REGEX.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("invalid regex pattern"))
}

/// Parses a free-text reference against the loaded data.
///
/// The book name is matched case-insensitively against book display names.
/// Chapter and verse are bounds-checked against the matched book; anything
/// out of range (including zero) yields `None`, so callers can fall back to
/// full-text search.
///
/// # Example
/// ```
/// use singverse_bible::{parse_reference, BibleData, Book, Chapter, Verse};
///
/// let data = BibleData {
///     books: vec![Book {
///         id: "john".to_string(),
///         name: "John".to_string(),
///         chapters: vec![Chapter {
///             verses: vec![Verse { n: 1, t: "In the beginning was the Word".to_string() }],
///         }],
///     }],
///     order: vec!["john".to_string()],
/// };
///
/// let sel = parse_reference("john 1:1", &data).unwrap();
/// assert_eq!(sel.book_id, "john");
/// assert_eq!(sel.verse, Some(1));
/// assert!(parse_reference("John 1:2", &data).is_none());
/// ```
pub fn parse_reference(query: &str, data: &BibleData) -> Option<Selection> {
    let caps = reference_regex().captures(query.trim())?;

    let name = normalize_book_name(caps.get(1)?.as_str());
    let book = data.book_by_name(&name)?;

    let chapter: u32 = caps.get(2)?.as_str().parse().ok()?;
    if chapter < 1 || chapter as usize > book.chapters.len() {
        return None;
    }

    let verse = match caps.get(3) {
        Some(m) => {
            let verse: u32 = m.as_str().parse().ok()?;
            let count = book.chapters[chapter as usize - 1].verses.len();
            if verse < 1 || verse as usize > count {
                return None;
            }
            Some(verse)
        }
        None => None,
    };

    Some(Selection {
        book_id: book.id.clone(),
        chapter,
        verse,
    })
}

impl Selection {
    /// Returns the route path for this selection.
    pub fn to_route(&self) -> String {
        match self.verse {
            Some(verse) => format!("/v/{}/{}/{}", self.book_id, self.chapter, verse),
            None => format!("/b/{}/{}", self.book_id, self.chapter),
        }
    }
}

/// Parses a route path without consulting the data.
///
/// Accepts an optional leading `#` (hash-router form). Returns `None` for
/// anything that is not a well-formed `/b/..` or `/v/..` route.
pub fn parse_route(route: &str) -> Option<Selection> {
    let route = route.trim().trim_start_matches('#');
    let parts: Vec<&str> = route.trim_matches('/').split('/').collect();

    match parts.as_slice() {
        ["b", book, chapter] if !book.is_empty() => {
            Some(Selection::chapter(*book, chapter.parse().ok()?))
        }
        ["v", book, chapter, verse] if !book.is_empty() => Some(Selection::verse(
            *book,
            chapter.parse().ok()?,
            verse.parse().ok()?,
        )),
        _ => None,
    }
}

/// Resolves a route to a position that exists in the data.
///
/// Unknown books fall back to the first book, unknown chapters to chapter 1,
/// and a verse is kept only when the chapter has it. Malformed routes resolve
/// as [`DEFAULT_ROUTE`]. Returns `None` only when the data has no books.
pub fn resolve_route(data: &BibleData, route: &str) -> Option<Selection> {
    let wanted = parse_route(route).unwrap_or_else(|| Selection::chapter("genesis", 1));

    let book = data
        .book(&wanted.book_id)
        .or_else(|| data.books.first())?;

    let chapter_no = match book.chapter(wanted.chapter) {
        Some(_) => wanted.chapter,
        None => 1,
    };
    let chapter = book.chapter(chapter_no)?;

    let verse = wanted
        .verse
        .filter(|v| *v >= 1 && (*v as usize) <= chapter.verses.len());

    Some(Selection {
        book_id: book.id.clone(),
        chapter: chapter_no,
        verse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Book, Chapter, Verse};
    use pretty_assertions::assert_eq;

    fn book(id: &str, name: &str, verse_counts: &[u32]) -> Book {
        Book {
            id: id.to_string(),
            name: name.to_string(),
            chapters: verse_counts
                .iter()
                .map(|&count| Chapter {
                    verses: (1..=count)
                        .map(|n| Verse {
                            n,
                            t: format!("{} verse {}", name, n),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn sample() -> BibleData {
        let books = vec![
            book("genesis", "Genesis", &[31, 25]),
            book("song-of-solomon", "Song of Solomon", &[17]),
            book("john", "John", &[51, 25, 36]),
            book("1-john", "1 John", &[10, 29]),
        ];
        let order = books.iter().map(|b| b.id.clone()).collect();
        BibleData { books, order }
    }

    #[test]
    fn test_parse_chapter_and_verse() {
        let data = sample();
        assert_eq!(
            parse_reference("John 3:16", &data),
            Some(Selection::verse("john", 3, 16))
        );
        assert_eq!(
            parse_reference("  john 3  ", &data),
            Some(Selection::chapter("john", 3))
        );
    }

    #[test]
    fn test_parse_numbered_and_multiword_books() {
        let data = sample();
        assert_eq!(
            parse_reference("1 John 2:29", &data),
            Some(Selection::verse("1-john", 2, 29))
        );
        assert_eq!(
            parse_reference("1john 1", &data),
            None,
            "book names are matched against display names"
        );
        assert_eq!(
            parse_reference("song  of   SOLOMON 1:17", &data),
            Some(Selection::verse("song-of-solomon", 1, 17))
        );
    }

    #[test]
    fn test_out_of_range_yields_none() {
        let data = sample();
        assert_eq!(parse_reference("John 0", &data), None);
        assert_eq!(parse_reference("John 4", &data), None);
        assert_eq!(parse_reference("John 3:0", &data), None);
        assert_eq!(parse_reference("John 3:37", &data), None);
        assert_eq!(parse_reference("John 99999999999999999999", &data), None);
    }

    #[test]
    fn test_non_references_yield_none() {
        let data = sample();
        assert_eq!(parse_reference("", &data), None);
        assert_eq!(parse_reference("love", &data), None);
        assert_eq!(parse_reference("Exodus 1", &data), None);
        assert_eq!(parse_reference("John 3:16-18", &data), None);
        assert_eq!(parse_reference("4 John 1", &data), None);
    }

    #[test]
    fn test_route_roundtrip() {
        let sel = Selection::verse("john", 3, 16);
        assert_eq!(sel.to_route(), "/v/john/3/16");
        assert_eq!(parse_route("#/v/john/3/16"), Some(sel));

        let sel = Selection::chapter("genesis", 1);
        assert_eq!(sel.to_route(), "/b/genesis/1");
        assert_eq!(parse_route(DEFAULT_ROUTE), Some(sel));
    }

    #[test]
    fn test_parse_route_rejects_malformed() {
        assert_eq!(parse_route("/"), None);
        assert_eq!(parse_route("/b/john"), None);
        assert_eq!(parse_route("/b/john/three"), None);
        assert_eq!(parse_route("/x/john/3"), None);
        assert_eq!(parse_route("/v/john/3/16/2"), None);
    }

    #[test]
    fn test_resolve_route_falls_back() {
        let data = sample();
        assert_eq!(
            resolve_route(&data, "/v/john/3/16"),
            Some(Selection::verse("john", 3, 16))
        );
        assert_eq!(
            resolve_route(&data, "/b/tobit/2"),
            Some(Selection::chapter("genesis", 2))
        );
        assert_eq!(
            resolve_route(&data, "/v/john/9/1"),
            Some(Selection::verse("john", 1, 1))
        );
        assert_eq!(
            resolve_route(&data, "/v/john/3/99"),
            Some(Selection::chapter("john", 3))
        );
        assert_eq!(
            resolve_route(&data, "garbage"),
            Some(Selection::chapter("genesis", 1))
        );
        assert_eq!(resolve_route(&BibleData::default(), "/b/genesis/1"), None);
    }
}
