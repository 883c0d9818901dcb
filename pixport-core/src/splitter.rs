//! Export blob splitting.
//!
//! An export file is one blob holding every article of a blog, separated by
//! a literal delimiter line. The source platform guarantees by convention
//! that the delimiter never occurs inside article content.

use std::borrow::Cow;

/// Token that separates two articles inside an export blob.
pub const ARTICLE_DELIMITER: &str = "\n--------";

/// Strip carriage returns so the line-based delimiter match works for both
/// CRLF and LF source files.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace('\r', ""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Split an export blob into raw article chunks. Boundary artifacts that
/// trim to nothing are dropped, so an empty input yields an empty sequence.
pub fn split_articles(text: &str) -> Vec<&str> {
    text.split(ARTICLE_DELIMITER)
        .filter(|chunk| !chunk.trim().is_empty())
        .collect()
}
