//! Markdown document assembly: YAML front matter, title heading, body.

use crate::article::Article;

/// Render the output document for one article.
pub fn to_markdown_document(article: &Article) -> String {
    let tags = front_matter_tags(article)
        .iter()
        .map(|tag| yaml_scalar(tag))
        .collect::<Vec<_>>()
        .join(", ");

    let mut doc = String::new();
    doc.push_str("---\n");
    doc.push_str(&format!("title: {}\n", yaml_scalar(&article.title)));
    doc.push_str(&format!("date: {}\n", article.date.format("%Y-%m-%dT%H:%M:00+08")));
    doc.push_str(&format!("tags: [{tags}]\n"));
    doc.push_str("---\n");
    doc.push_str(&format!("# {}\n", article.title));
    if !article.body.is_empty() {
        doc.push('\n');
        doc.push_str(&article.body);
        doc.push('\n');
    }
    doc
}

/// Front-matter tag list: the primary category (when present) always leads,
/// duplicates dropped while keeping first-occurrence order.
pub fn front_matter_tags(article: &Article) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in article.primary_category.iter().chain(article.tags.iter()) {
        if !out.iter().any(|seen| seen == tag) {
            out.push(tag.clone());
        }
    }
    out
}

/// Quote a YAML scalar only when the plain form would change its meaning.
fn yaml_scalar(value: &str) -> String {
    let starts_badly = value
        .chars()
        .next()
        .is_some_and(|ch| "-?:[]{}#&*!|>'\"%@` ".contains(ch));
    let needs_quotes = value.is_empty()
        || starts_badly
        || value.ends_with([' ', ':'])
        || value.contains(": ")
        || value.contains(" #")
        || value.contains(['\n', '"', '\\', ',', '[', ']', '{', '}']);

    if needs_quotes {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
    } else {
        value.to_string()
    }
}
