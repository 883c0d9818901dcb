//! Code-block language normalization.
//!
//! The export dialect marks highlighted code two ways: a `<textarea>` whose
//! class is the language name, and a `<pre>` carrying a SyntaxHighlighter
//! `brush: lang` class. Both are rewritten to the canonical
//! `<pre><code class="language-x">` form before the chunk is parsed, so the
//! body converter only ever sees one shape.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

static TEXTAREA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<textarea[^>]*?class="([^"]+)"[^>]*?>(.+?)</textarea>"#).expect("textarea pattern")
});

static BRUSH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<pre[^>]*?class="brush: ([^;"]+)[^"]*"[^>]*?>(.+?)</pre>"#).expect("brush pattern")
});

/// Canonical fence tag for a raw language name, if the table knows it.
pub fn language_tag(raw: &str) -> Option<&'static str> {
    match raw {
        "C++" | "c" | "cpp" => Some("cpp"),
        "java" => Some("java"),
        "javascript" => Some("js"),
        "php" => Some("php"),
        _ => None,
    }
}

/// Rewrite both code-block markup dialects to the canonical form. Pure
/// `text -> text`; runs on the whole raw chunk before any splitting.
pub fn rewrite_code_blocks(chunk: &str) -> String {
    let pass = TEXTAREA_RE.replace_all(chunk, rewrite_match);
    BRUSH_RE.replace_all(&pass, rewrite_match).into_owned()
}

fn rewrite_match(caps: &Captures) -> String {
    let raw_lang = caps[1].trim();
    let lang = match language_tag(raw_lang) {
        Some(lang) => lang,
        None => {
            // Pass-through keeps the article usable; the table can grow later.
            warn!(lang = raw_lang, "unrecognized code language tag");
            raw_lang
        }
    };
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>",
        lang,
        caps[2].trim()
    )
}
