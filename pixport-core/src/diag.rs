//! Failure reporting.
//!
//! Rendering is a pure function invoked at each log call site; there is no
//! process-wide formatter state. The report carries enough of the offending
//! chunk to debug a failure without re-running the batch.

use serde_json::json;

use crate::article::SECTION_DELIMITER;
use crate::error::ParseError;
use crate::header::parse_header;

const CHUNK_EXCERPT_CHARS: usize = 200;

/// Render a parse failure plus the partial article state as one JSON line.
pub fn failure_report(err: &ParseError, chunk: &str) -> String {
    let head = chunk.split(SECTION_DELIMITER).next().unwrap_or("");
    let header = parse_header(head.trim());
    json!({
        "kind": err.kind(),
        "error": err.to_string(),
        "title": header.title,
        "date": header.date,
        "tags": header.tags,
        "status": header.status,
        "chunk": excerpt(chunk),
    })
    .to_string()
}

fn excerpt(chunk: &str) -> String {
    let trimmed = chunk.trim_start();
    let mut out = String::new();
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= CHUNK_EXCERPT_CHARS {
            out.push('…');
            break;
        }
        out.push(ch);
    }
    out
}
