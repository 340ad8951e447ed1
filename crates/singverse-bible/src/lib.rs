//! SingTheVerse verse data library.
//!
//! This crate provides the verse data model and the text-side logic of the
//! reader: parsing free-text references, resolving reader routes, full-text
//! search with display snippets, and normalization and validation of the
//! KJV source data.
//!
//! # Example
//!
//! ```
//! use singverse_bible::{lookup, normalize, BibleData, SearchIndex, SearchOutcome, Selection};
//!
//! let raw = r#"{"books": [{"name": "John", "chapters": [
//!     {"verses": [{"verse": 1, "text": "In the beginning was the Word"}]}
//! ]}]}"#;
//! let data: BibleData = normalize::normalize_json(raw).unwrap();
//! let index = SearchIndex::build(&data);
//!
//! assert_eq!(
//!     lookup("John 1:1", &data, &index, 25),
//!     SearchOutcome::Reference(Selection::verse("john", 1, 1))
//! );
//! match lookup("the word", &data, &index, 25) {
//!     SearchOutcome::Hits(hits) => assert_eq!(hits.len(), 1),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types
//! - [`model`]: Books, chapters, verses, and selections
//! - [`normalize`]: Raw source conversion and slugs
//! - [`reference`]: Reference parsing and routes
//! - [`search`]: Search index, lookup, and snippets
//! - [`validation`]: Data validation

pub mod error;
pub mod model;
pub mod normalize;
pub mod reference;
pub mod search;
pub mod validation;

// Re-export commonly used types at the crate root
pub use error::{
    BibleError, ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use model::{format_reference, BibleData, Book, Chapter, Selection, Verse};
pub use reference::{parse_reference, parse_route, resolve_route, DEFAULT_ROUTE};
pub use search::{
    lookup, make_snippet, SearchHit, SearchIndex, SearchOutcome, DEFAULT_SEARCH_LIMIT,
};
pub use validation::validate_bible;
