//! Verse data validation.

use std::collections::HashSet;

use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::model::BibleData;

/// Validates verse data and returns a validation result.
///
/// Errors make the data unusable for navigation (reference parsing and
/// routes rely on non-empty, uniquely identified books and chapters).
/// Warnings flag source irregularities the reader tolerates.
///
/// # Example
/// ```
/// use singverse_bible::{validate_bible, BibleData, ErrorCode};
///
/// let result = validate_bible(&BibleData::default());
/// assert!(!result.is_ok());
/// assert_eq!(result.errors[0].code, ErrorCode::NoBooks);
/// ```
pub fn validate_bible(data: &BibleData) -> ValidationResult {
    let mut result = ValidationResult::default();

    if data.books.is_empty() {
        result.add_error(ValidationError::with_path(
            ErrorCode::NoBooks,
            "books array must have at least one entry",
            "books",
        ));
        return result;
    }

    validate_book_ids(data, &mut result);
    validate_order(data, &mut result);
    validate_contents(data, &mut result);

    result
}

fn validate_book_ids(data: &BibleData, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for (i, book) in data.books.iter().enumerate() {
        if !seen.insert(book.id.as_str()) {
            result.add_error(ValidationError::with_path(
                ErrorCode::DuplicateBookId,
                format!("duplicate book id '{}'", book.id),
                format!("books[{}].id", i),
            ));
        }
    }
}

fn validate_order(data: &BibleData, result: &mut ValidationResult) {
    let ids = data.books.iter().map(|b| b.id.as_str());
    if !ids.eq(data.order.iter().map(String::as_str)) {
        result.add_error(ValidationError::with_path(
            ErrorCode::OrderMismatch,
            format!(
                "order lists {} id(s) that do not match the {} book(s) in sequence",
                data.order.len(),
                data.books.len()
            ),
            "order",
        ));
    }
}

fn validate_contents(data: &BibleData, result: &mut ValidationResult) {
    for (bi, book) in data.books.iter().enumerate() {
        if book.chapters.is_empty() {
            result.add_error(ValidationError::with_path(
                ErrorCode::EmptyBook,
                format!("book '{}' has no chapters", book.name),
                format!("books[{}].chapters", bi),
            ));
            continue;
        }

        for (ci, chapter) in book.chapters.iter().enumerate() {
            let path = format!("books[{}].chapters[{}]", bi, ci);
            if chapter.verses.is_empty() {
                result.add_error(ValidationError::with_path(
                    ErrorCode::EmptyChapter,
                    format!("{} {} has no verses", book.name, ci + 1),
                    format!("{}.verses", path),
                ));
                continue;
            }

            let sequential = chapter
                .verses
                .iter()
                .enumerate()
                .all(|(vi, v)| v.n as usize == vi + 1);
            if !sequential {
                result.add_warning(ValidationWarning::with_path(
                    WarningCode::VerseNumberGap,
                    format!(
                        "{} {} verse numbers are not sequential from 1",
                        book.name,
                        ci + 1
                    ),
                    format!("{}.verses", path),
                ));
            }

            for (vi, verse) in chapter.verses.iter().enumerate() {
                if verse.t.trim().is_empty() {
                    result.add_warning(ValidationWarning::with_path(
                        WarningCode::EmptyVerseText,
                        format!("{} {}:{} has empty text", book.name, ci + 1, verse.n),
                        format!("{}.verses[{}].t", path, vi),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Book, Chapter, Verse};

    fn verse(n: u32, t: &str) -> Verse {
        Verse {
            n,
            t: t.to_string(),
        }
    }

    fn valid() -> BibleData {
        BibleData {
            books: vec![
                Book {
                    id: "ruth".to_string(),
                    name: "Ruth".to_string(),
                    chapters: vec![Chapter {
                        verses: vec![verse(1, "Now it came to pass"), verse(2, "And the name")],
                    }],
                },
                Book {
                    id: "jude".to_string(),
                    name: "Jude".to_string(),
                    chapters: vec![Chapter {
                        verses: vec![verse(1, "Jude, the servant")],
                    }],
                },
            ],
            order: vec!["ruth".to_string(), "jude".to_string()],
        }
    }

    #[test]
    fn test_valid_data_passes() {
        let result = validate_bible(&valid());
        assert!(result.is_ok(), "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_ids_and_order() {
        let mut data = valid();
        data.books[1].id = "ruth".to_string();
        let result = validate_bible(&data);
        let codes: Vec<_> = result.errors.iter().map(|e| e.code).collect();
        assert!(codes.contains(&ErrorCode::DuplicateBookId));
        assert!(codes.contains(&ErrorCode::OrderMismatch));
        assert_eq!(result.errors[0].path.as_deref(), Some("books[1].id"));
    }

    #[test]
    fn test_order_must_match_books() {
        let mut data = valid();
        data.order.reverse();
        let result = validate_bible(&data);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::OrderMismatch);
    }

    #[test]
    fn test_empty_book_and_chapter() {
        let mut data = valid();
        data.books[0].chapters.push(Chapter::default());
        data.books[1].chapters.clear();
        let result = validate_bible(&data);
        let codes: Vec<_> = result.errors.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::EmptyChapter, ErrorCode::EmptyBook]);
        assert_eq!(
            result.errors[0].to_string(),
            "E004: Ruth 2 has no verses (at books[0].chapters[1].verses)"
        );
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let mut data = valid();
        data.books[0].chapters[0].verses[1] = verse(5, "   ");
        let result = validate_bible(&data);
        assert!(result.is_ok());
        let codes: Vec<_> = result.warnings.iter().map(|w| w.code).collect();
        assert_eq!(
            codes,
            vec![WarningCode::VerseNumberGap, WarningCode::EmptyVerseText]
        );
    }
}
