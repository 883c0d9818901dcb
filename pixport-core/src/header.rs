//! Header block field extraction.
//!
//! The header of an article chunk is a run of `Key: Value` lines of varying
//! quality. Lines that do not match the pattern are ignored rather than
//! rejected; the export format is permissive and real archives contain
//! stray text between fields.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static FIELD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^:]+): (.+)$").expect("header field regex"));

/// Header fields of one article before derivation. Known keys land in typed
/// slots; anything else is retained opaquely under its camelCase key.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawHeader {
    pub title: Option<String>,
    pub date: Option<String>,
    pub tags: Option<String>,
    pub status: Option<String>,
    pub primary_category: Option<String>,
    pub extra: BTreeMap<String, String>,
}

/// Extract `Key: Value` fields from a header block. A repeated key keeps the
/// last value.
pub fn parse_header(head: &str) -> RawHeader {
    let mut header = RawHeader::default();
    for line in head.lines() {
        let Some(caps) = FIELD_RE.captures(line.trim()) else {
            continue;
        };
        let key = camel_case(caps[1].trim());
        let value = caps[2].trim().to_string();
        match key.as_str() {
            "title" => header.title = Some(value),
            "date" => header.date = Some(value),
            "tags" => header.tags = Some(value),
            "status" => header.status = Some(value),
            "primaryCategory" => header.primary_category = Some(value),
            _ => {
                header.extra.insert(key, value);
            }
        }
    }
    header
}

/// camelCase form of a header key: `Primary category` becomes
/// `primaryCategory`, `POST-ID` becomes `postId`.
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut boundary = false;
    for ch in key.chars() {
        if ch.is_alphanumeric() {
            if boundary && !out.is_empty() {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            boundary = false;
        } else {
            boundary = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_variants() {
        assert_eq!(camel_case("title"), "title");
        assert_eq!(camel_case("Primary category"), "primaryCategory");
        assert_eq!(camel_case("primary-category"), "primaryCategory");
        assert_eq!(camel_case("POST ID"), "postId");
    }

    #[test]
    fn known_fields_land_in_typed_slots() {
        let header = parse_header(
            "title: Hello\ndate: 2020-01-02 10:00\ntags: \"a\",\"b\"\nstatus: published\nPrimary category: life",
        );
        assert_eq!(header.title.as_deref(), Some("Hello"));
        assert_eq!(header.date.as_deref(), Some("2020-01-02 10:00"));
        assert_eq!(header.tags.as_deref(), Some("\"a\",\"b\""));
        assert_eq!(header.status.as_deref(), Some("published"));
        assert_eq!(header.primary_category.as_deref(), Some("life"));
        assert!(header.extra.is_empty());
    }

    #[test]
    fn unknown_fields_are_retained() {
        let header = parse_header("title: X\nHit count: 42");
        assert_eq!(header.extra.get("hitCount").map(String::as_str), Some("42"));
    }

    #[test]
    fn non_matching_lines_are_ignored() {
        let header = parse_header("just some text\ntitle: X\n: no key\nno value:");
        assert_eq!(header.title.as_deref(), Some("X"));
        assert!(header.extra.is_empty());
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let header = parse_header("title: First\ntitle: Second");
        assert_eq!(header.title.as_deref(), Some("Second"));
    }
}
