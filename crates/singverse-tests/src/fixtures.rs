//! Test fixtures: a small verse source in the raw scrollmapper layout and a
//! temporary offline cache.

use serde_json::{json, Value};
use singverse_bible::{normalize, BibleData};
use singverse_cli::cache::CacheManager;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Source URL recorded for fixture data.
pub const FIXTURE_URL: &str = "https://example.invalid/KJV.json";

fn chapter(verses: &[&str]) -> Value {
    let verses: Vec<Value> = verses
        .iter()
        .enumerate()
        .map(|(i, text)| json!({ "verse": i + 1, "text": text }))
        .collect();
    json!({ "verses": verses })
}

fn filler_chapter(book: &str, chapter_no: usize, count: usize) -> Value {
    let texts: Vec<String> = (1..=count)
        .map(|n| format!("Verse {} of {} {}.", n, book, chapter_no))
        .collect();
    let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
    chapter(&refs)
}

/// Raw source JSON with Genesis, Psalms, Song of Solomon, John, and 1 John.
///
/// Real text where tests look at it (Genesis 1, Psalm 23, John 1, John 3:16);
/// numbered filler elsewhere.
pub fn raw_source() -> String {
    let mut john_3: Vec<String> = (1..=15)
        .map(|n| format!("Verse {} of John 3.", n))
        .collect();
    john_3.push(
        "For God so loved the world, that he gave his only begotten Son, that whosoever \
         believeth in him should not perish, but have everlasting life."
            .to_string(),
    );
    let john_3: Vec<&str> = john_3.iter().map(|s| s.as_str()).collect();

    let psalms: Vec<Value> = (1..=23)
        .map(|c| {
            if c == 23 {
                chapter(&[
                    "The LORD is my shepherd; I shall not want.",
                    "He maketh me to lie down in green pastures: he leadeth me beside the still waters.",
                ])
            } else {
                filler_chapter("Psalms", c, 2)
            }
        })
        .collect();

    let source = json!({
        "translation": "KJV",
        "books": [
            {
                "name": "Genesis",
                "chapters": [
                    chapter(&[
                        "In the beginning God created the heaven and the earth.",
                        "And the earth was without form, and void; and darkness was upon the face of the deep. And the Spirit of God moved upon the face of the waters.",
                        "And God said, Let there be light: and there was light.",
                    ]),
                    filler_chapter("Genesis", 2, 3),
                ]
            },
            {
                "name": "Psalms",
                "chapters": psalms
            },
            {
                "name": "Song of Solomon",
                "chapters": [chapter(&["The song of songs, which is Solomon's."])]
            },
            {
                "name": "John",
                "chapters": [
                    chapter(&[
                        "In the beginning was the Word, and the Word was with God, and the Word was God.",
                        "The same was in the beginning with God.",
                    ]),
                    filler_chapter("John", 2, 2),
                    chapter(&john_3),
                ]
            },
            {
                "name": "1 John",
                "chapters": [chapter(&[
                    "That which was from the beginning, which we have heard, which we have seen with our eyes.",
                ])]
            }
        ]
    });
    source.to_string()
}

/// The normalized fixture data.
pub fn sample_bible() -> BibleData {
    normalize::normalize_json(&raw_source()).expect("fixture source normalizes")
}

/// A temporary offline cache, optionally pre-populated with the fixture data.
pub struct CacheFixture {
    pub root: TempDir,
    pub cache: CacheManager,
}

impl CacheFixture {
    /// Create an empty cache.
    pub fn empty() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let cache = CacheManager::with_dir(root.path().join("cache"));
        Self { root, cache }
    }

    /// Create a cache holding the fixture data.
    pub fn with_data() -> Self {
        let fixture = Self::empty();
        fixture
            .cache
            .store_data(&sample_bible(), FIXTURE_URL)
            .expect("Failed to store fixture data");
        fixture
    }

    /// Get the fixture root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write the raw fixture source next to the cache and return its path.
    pub fn write_raw_source(&self) -> PathBuf {
        let path = self.root.path().join("kjv.raw.json");
        fs::write(&path, raw_source()).expect("Failed to write raw source");
        path
    }
}
