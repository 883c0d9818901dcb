//! Article record parsing and normalization.
//!
//! One chunk of an export blob becomes one [`Article`], a draft sentinel,
//! or a "not an article" marker for boundary artifacts. Normalization is
//! pure: the only shared state is the static code-language table.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

use crate::error::{ParseError, Result};
use crate::header::{parse_header, RawHeader};
use crate::highlight;
use crate::htmlmd::{self, MarkdownOptions};
use crate::slug;
use crate::tags;

/// Token that separates the header, body, and comment sections of a chunk.
pub const SECTION_DELIMITER: &str = "\n-----";

/// Label line the export prepends to the body section.
const BODY_LABEL: &str = "body:";

/// Export timestamps carry no zone; the source platform wrote them in UTC+8.
pub const EXPORT_UTC_OFFSET_HOURS: i32 = 8;

/// One normalized article, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub date: DateTime<FixedOffset>,
    pub tags: Vec<String>,
    pub status: String,
    pub primary_category: Option<String>,
    /// Unknown header fields, keyed by their camelCase form
    pub extra: BTreeMap<String, String>,
    /// Body markup converted to Markdown
    pub body: String,
    /// Comment blocks, preserved as raw text
    pub comments: Vec<String>,
    /// `{date}-{slug}`, unique per output directory once allocated
    pub file_stem: String,
}

/// What one raw chunk turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    Article(Box<Article>),
    /// Parsed fine but suppressed from output
    Draft { title: String },
    /// Boundary artifact with no header; dropped silently
    NotArticle,
}

/// Parse one raw chunk into an article record.
///
/// Errors skip this article only; the surrounding batch keeps going.
pub fn normalize_chunk(raw: &str) -> Result<ChunkOutcome> {
    let rewritten = highlight::rewrite_code_blocks(raw);
    let mut sections = rewritten.split(SECTION_DELIMITER).map(str::trim);

    let head = match sections.next() {
        Some(head) if !head.is_empty() => head,
        _ => return Ok(ChunkOutcome::NotArticle),
    };
    let body_section = sections.next().unwrap_or("");
    let comments: Vec<String> = sections.map(str::to_string).collect();

    let RawHeader {
        title,
        date,
        tags: raw_tags,
        status,
        primary_category,
        extra,
    } = parse_header(head);

    let title = title.ok_or(ParseError::MissingField { field: "title" })?;
    let date = parse_export_date(date.as_deref())?;
    let tags = raw_tags
        .as_deref()
        .map(tags::parse_tag_list)
        .transpose()?
        .unwrap_or_default();
    let body = htmlmd::convert(strip_body_label(body_section), &MarkdownOptions::default());
    let file_stem = format!("{}-{}", date.format("%Y-%m-%d"), slug::slugify(&title));

    // An absent status means the export never published the article.
    let status = status.unwrap_or_else(|| "draft".to_string());
    if status == "draft" {
        return Ok(ChunkOutcome::Draft { title });
    }

    Ok(ChunkOutcome::Article(Box::new(Article {
        title,
        date,
        tags,
        status,
        primary_category,
        extra,
        body,
        comments,
        file_stem,
    })))
}

fn parse_export_date(raw: Option<&str>) -> Result<DateTime<FixedOffset>> {
    let raw = raw.ok_or(ParseError::MissingField { field: "date" })?;
    let trimmed = raw.trim();
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
        .map_err(|err| ParseError::invalid_date(trimmed, err.to_string()))?;
    let offset = FixedOffset::east_opt(EXPORT_UTC_OFFSET_HOURS * 3600).expect("static offset");
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ParseError::invalid_date(trimmed, "ambiguous local time"))
}

fn strip_body_label(section: &str) -> &str {
    match section.strip_prefix(BODY_LABEL) {
        Some(rest) => rest.trim_start(),
        None => section,
    }
}
