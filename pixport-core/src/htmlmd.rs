//! HTML to Markdown conversion for the export dialect's tag subset.
//!
//! Not a general engine: article bodies only ever contain a small set of
//! tags, and anything unknown degrades to its text content. `<script>`
//! elements are dropped entirely, content included. Code inside
//! `<pre><code>` is emitted verbatim; text everywhere else has entities
//! decoded and whitespace collapsed.

use std::borrow::Cow;

/// Rendering knobs, fixed by callers to the export's house style via
/// [`MarkdownOptions::default`].
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    pub heading_style: HeadingStyle,
    pub code_block_style: CodeBlockStyle,
    pub horizontal_rule: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    Atx,
    Setext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeBlockStyle {
    Fenced,
    Indented,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            horizontal_rule: "- - -".to_string(),
        }
    }
}

/// Convert a body fragment to Markdown.
pub fn convert(html: &str, opts: &MarkdownOptions) -> String {
    let mut lexer = Lexer::new(html);
    let mut conv = Converter::new(opts);
    while let Some(event) = lexer.next_event() {
        match event {
            Event::Text(text) => conv.push_text(text),
            Event::Open(tag) => conv.open_tag(&tag, &mut lexer),
            Event::Close(name) => conv.close_tag(&name),
        }
    }
    // Tolerate markup that never closed its last list or paragraph.
    while !conv.list_stack.is_empty() {
        conv.end_list();
    }
    conv.flush_block();
    conv.out
}

struct Tag {
    name: String,
    attrs: Vec<(String, String)>,
}

impl Tag {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }
}

enum Event<'a> {
    Text(&'a str),
    Open(Tag),
    Close(String),
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn next_event(&mut self) -> Option<Event<'a>> {
        loop {
            if self.pos >= self.input.len() {
                return None;
            }
            let rest = &self.input[self.pos..];
            if !rest.starts_with('<') {
                let end = rest.find('<').unwrap_or(rest.len());
                self.pos += end;
                return Some(Event::Text(&rest[..end]));
            }
            if rest.starts_with("<!--") {
                self.pos += rest.find("-->").map(|i| i + 3).unwrap_or(rest.len());
                continue;
            }
            if let Some(after) = rest.strip_prefix("</") {
                let end = after.find('>');
                let name_end = end.unwrap_or(after.len());
                let name = after[..name_end].trim().to_ascii_lowercase();
                self.pos += 2 + name_end + usize::from(end.is_some());
                return Some(Event::Close(name));
            }
            let after = &rest[1..];
            if !after.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
                // stray '<' is ordinary text
                self.pos += 1;
                return Some(Event::Text("<"));
            }
            let end = after.find('>');
            let tag_end = end.unwrap_or(after.len());
            let raw_tag = after[..tag_end].trim_end_matches('/');
            self.pos += 1 + tag_end + usize::from(end.is_some());
            let name_len = raw_tag
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .count();
            let name = raw_tag[..name_len].to_ascii_lowercase();
            let attrs = parse_attrs(&raw_tag[name_len..]);
            return Some(Event::Open(Tag { name, attrs }));
        }
    }

    /// Raw text up to the matching close tag, which is consumed as well.
    /// Used for `<pre>` and `<script>`, whose content must not be tokenized.
    fn raw_until_close(&mut self, name: &str) -> &'a str {
        let rest = &self.input[self.pos..];
        let needle = format!("</{name}");
        match rest.to_ascii_lowercase().find(&needle) {
            Some(idx) => {
                let after = &rest[idx..];
                let skip = after.find('>').map(|i| i + 1).unwrap_or(after.len());
                self.pos += idx + skip;
                &rest[..idx]
            }
            None => {
                self.pos = self.input.len();
                rest
            }
        }
    }
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        let start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' && bytes[i] != b'/' {
            i += 1;
        }
        if i == start {
            i += 1;
            continue;
        }
        let name = raw[start..i].to_ascii_lowercase();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let vstart = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                value = decode_entities(&raw[vstart..i]).into_owned();
                if i < bytes.len() {
                    i += 1;
                }
            } else {
                let vstart = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = decode_entities(&raw[vstart..i]).into_owned();
            }
        }
        attrs.push((name, value));
    }
    attrs
}

struct ListState {
    ordered: bool,
    index: usize,
}

struct Converter<'o> {
    opts: &'o MarkdownOptions,
    out: String,
    block: String,
    quote_depth: usize,
    list_stack: Vec<ListState>,
    list_lines: Vec<String>,
    item_prefix: Option<String>,
    link_stack: Vec<String>,
    pending_open: Option<usize>,
}

impl<'o> Converter<'o> {
    fn new(opts: &'o MarkdownOptions) -> Self {
        Self {
            opts,
            out: String::new(),
            block: String::new(),
            quote_depth: 0,
            list_stack: Vec::new(),
            list_lines: Vec::new(),
            item_prefix: None,
            link_stack: Vec::new(),
            pending_open: None,
        }
    }

    fn push_text(&mut self, raw: &str) {
        let decoded = decode_entities(raw);
        let collapsed = collapse_whitespace(&decoded);
        if let Some(len) = self.pending_open.take() {
            // The markup put whitespace inside the emphasis; Markdown wants
            // it outside the delimiter.
            if collapsed.starts_with(' ')
                && self.block.len() >= len
                && self.block.ends_with(['*', '`'])
            {
                let delim = self.block.split_off(self.block.len() - len);
                self.block.push(' ');
                self.block.push_str(&delim);
                self.block.push_str(collapsed.trim_start_matches(' '));
                return;
            }
        }
        self.block.push_str(&collapsed);
    }

    fn open_tag(&mut self, tag: &Tag, lexer: &mut Lexer) {
        match tag.name.as_str() {
            "script" => {
                let _ = lexer.raw_until_close("script");
            }
            "pre" => {
                let raw = lexer.raw_until_close("pre");
                self.emit_code_block(raw);
            }
            "p" => self.flush_block(),
            "br" => self.block.push_str("  \n"),
            "hr" => {
                self.flush_block();
                let rule = self.opts.horizontal_rule.clone();
                self.emit_block(rule);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => self.flush_block(),
            "strong" | "b" => self.open_inline("**"),
            "em" | "i" => self.open_inline("*"),
            "code" => self.open_inline("`"),
            "a" => {
                self.link_stack
                    .push(tag.attr("href").unwrap_or_default().to_string());
                self.block.push('[');
            }
            "img" => {
                let alt = tag.attr("alt").unwrap_or_default();
                let src = tag.attr("src").unwrap_or_default();
                self.block.push_str(&format!("![{alt}]({src})"));
            }
            "blockquote" => {
                self.flush_block();
                self.quote_depth += 1;
            }
            "ul" => self.begin_list(false),
            "ol" => self.begin_list(true),
            "li" => self.begin_item(),
            // div, span, font and friends are transparent
            _ => {}
        }
    }

    fn close_tag(&mut self, name: &str) {
        match name {
            "p" => self.flush_block(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.close_heading(heading_level(name));
            }
            "strong" | "b" => self.close_inline("**"),
            "em" | "i" => self.close_inline("*"),
            "code" => self.close_inline("`"),
            "a" => {
                let href = self.link_stack.pop().unwrap_or_default();
                self.close_inline(&format!("]({href})"));
            }
            "blockquote" => {
                self.flush_block();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            "li" => {
                if self.list_stack.is_empty() {
                    self.flush_block();
                } else {
                    self.push_item_line();
                }
            }
            "ul" | "ol" => self.end_list(),
            _ => {}
        }
    }

    fn open_inline(&mut self, delim: &str) {
        self.block.push_str(delim);
        self.pending_open = Some(delim.len());
    }

    fn close_inline(&mut self, delim: &str) {
        self.pending_open = None;
        let mut trailing = false;
        while self.block.ends_with(' ') {
            self.block.pop();
            trailing = true;
        }
        self.block.push_str(delim);
        if trailing {
            self.block.push(' ');
        }
    }

    fn close_heading(&mut self, level: usize) {
        let text = self.block.trim().to_string();
        self.block.clear();
        if text.is_empty() {
            return;
        }
        let block = match self.opts.heading_style {
            HeadingStyle::Atx => format!("{} {}", "#".repeat(level), text),
            HeadingStyle::Setext if level == 1 => {
                format!("{}\n{}", text, "=".repeat(text.chars().count().max(3)))
            }
            HeadingStyle::Setext if level == 2 => {
                format!("{}\n{}", text, "-".repeat(text.chars().count().max(3)))
            }
            // Setext has no form below h2
            HeadingStyle::Setext => format!("{} {}", "#".repeat(level), text),
        };
        self.emit_block(block);
    }

    fn emit_code_block(&mut self, raw_inner: &str) {
        self.flush_block();
        let (lang, body) = split_code_wrapper(raw_inner.trim());
        let code = body.trim();
        if code.is_empty() {
            return;
        }
        let block = match self.opts.code_block_style {
            CodeBlockStyle::Fenced => {
                let fence = if code.contains("```") { "~~~" } else { "```" };
                format!("{fence}{}\n{code}\n{fence}", lang.as_deref().unwrap_or(""))
            }
            CodeBlockStyle::Indented => code
                .lines()
                .map(|line| format!("    {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        self.emit_block(block);
    }

    fn begin_list(&mut self, ordered: bool) {
        if self.list_stack.is_empty() {
            self.flush_block();
        } else {
            // A nested list opens inside an <li>; its pending text becomes a line.
            self.push_item_line();
        }
        self.list_stack.push(ListState { ordered, index: 0 });
    }

    fn begin_item(&mut self) {
        self.push_item_line();
        if let Some(top) = self.list_stack.last_mut() {
            top.index += 1;
            let marker = if top.ordered {
                format!("{}. ", top.index)
            } else {
                "- ".to_string()
            };
            let indent = "    ".repeat(self.list_stack.len() - 1);
            self.item_prefix = Some(format!("{indent}{marker}"));
        }
    }

    fn push_item_line(&mut self) {
        let text = self.block.trim().to_string();
        self.block.clear();
        if text.is_empty() {
            return;
        }
        let prefix = self.item_prefix.take().unwrap_or_default();
        self.list_lines.push(format!("{prefix}{text}"));
    }

    fn end_list(&mut self) {
        self.push_item_line();
        self.list_stack.pop();
        if self.list_stack.is_empty() && !self.list_lines.is_empty() {
            let lines = std::mem::take(&mut self.list_lines);
            self.emit_block(lines.join("\n"));
        }
    }

    fn flush_block(&mut self) {
        if !self.list_stack.is_empty() {
            // Block tags inside a list item contribute to the item line.
            self.push_item_line();
            return;
        }
        let text = self.block.trim().to_string();
        self.block.clear();
        self.emit_block(text);
    }

    fn emit_block(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        let text = if self.quote_depth > 0 {
            let prefix = "> ".repeat(self.quote_depth);
            text.lines()
                .map(|line| format!("{prefix}{line}"))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            text
        };
        if !self.out.is_empty() {
            self.out.push_str("\n\n");
        }
        self.out.push_str(&text);
    }
}

fn heading_level(name: &str) -> usize {
    name.strip_prefix('h')
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}

/// Peel an inner `<code class="language-x">` wrapper off captured `<pre>`
/// content, returning the language hint and the verbatim code text.
fn split_code_wrapper(inner: &str) -> (Option<String>, &str) {
    let wrapped = inner
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("<code"));
    if !wrapped {
        return (None, inner);
    }
    let Some(gt) = inner.find('>') else {
        return (None, inner);
    };
    let attrs = parse_attrs(&inner[5..gt]);
    let lang = attrs
        .iter()
        .find(|(name, _)| name == "class")
        .and_then(|(_, value)| {
            value
                .split_whitespace()
                .find_map(|class| class.strip_prefix("language-"))
        })
        .map(str::to_string);
    let body = inner[gt + 1..].trim_end();
    let body = body.strip_suffix("</code>").unwrap_or(body);
    (lang, body)
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_ws = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}

fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            decode_entity(&tail[1..semi]).map(|ch| (ch, semi))
        });
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(html: &str) -> String {
        convert(html, &MarkdownOptions::default())
    }

    #[test]
    fn paragraphs_and_emphasis() {
        assert_eq!(md("<p>Hi <strong>there</strong></p>"), "Hi **there**");
        assert_eq!(md("<p>a</p><p>b</p>"), "a\n\nb");
        assert_eq!(md("<p><em>soft</em> and <b>loud</b></p>"), "*soft* and **loud**");
    }

    #[test]
    fn whitespace_inside_emphasis_moves_outside() {
        assert_eq!(md("<p>a<strong> b </strong>c</p>"), "a **b** c");
    }

    #[test]
    fn atx_headings() {
        assert_eq!(md("<h2>Section</h2><p>text</p>"), "## Section\n\ntext");
    }

    #[test]
    fn setext_headings_when_configured() {
        let opts = MarkdownOptions {
            heading_style: HeadingStyle::Setext,
            ..MarkdownOptions::default()
        };
        assert_eq!(convert("<h1>Top</h1>", &opts), "Top\n===");
    }

    #[test]
    fn horizontal_rule_uses_configured_form() {
        assert_eq!(md("<p>a</p><hr><p>b</p>"), "a\n\n- - -\n\nb");
    }

    #[test]
    fn links_and_images() {
        assert_eq!(
            md(r#"<p><a href="http://x.test/?a=1&amp;b=2">go</a></p>"#),
            "[go](http://x.test/?a=1&b=2)"
        );
        assert_eq!(md(r#"<img src="pic.png" alt="a pic">"#), "![a pic](pic.png)");
    }

    #[test]
    fn fenced_code_block_with_language() {
        assert_eq!(
            md(r#"<pre><code class="language-cpp">int main(){}</code></pre>"#),
            "```cpp\nint main(){}\n```"
        );
    }

    #[test]
    fn code_text_is_verbatim() {
        assert_eq!(
            md("<pre><code>a &lt; b</code></pre>"),
            "```\na &lt; b\n```"
        );
    }

    #[test]
    fn indented_code_when_configured() {
        let opts = MarkdownOptions {
            code_block_style: CodeBlockStyle::Indented,
            ..MarkdownOptions::default()
        };
        assert_eq!(
            convert("<pre><code>one\ntwo</code></pre>", &opts),
            "    one\n    two"
        );
    }

    #[test]
    fn inline_code() {
        assert_eq!(md("<p>use <code>malloc</code></p>"), "use `malloc`");
    }

    #[test]
    fn script_content_is_dropped() {
        assert_eq!(md("<script>alert(1)</script><p>text</p>"), "text");
        assert_eq!(md(r#"<script src="a.js"></script><p>x</p>"#), "x");
    }

    #[test]
    fn lists() {
        assert_eq!(md("<ul><li>a</li><li>b</li></ul>"), "- a\n- b");
        assert_eq!(md("<ol><li>a</li><li>b</li></ol>"), "1. a\n2. b");
    }

    #[test]
    fn blockquote() {
        assert_eq!(md("<blockquote><p>quoted</p></blockquote>"), "> quoted");
    }

    #[test]
    fn entities_decode_outside_code() {
        assert_eq!(md("<p>a &amp; b &lt;c&gt; &#39;d&#39;</p>"), "a & b <c> 'd'");
    }

    #[test]
    fn unknown_tags_are_transparent() {
        assert_eq!(md(r#"<div><span style="color:red">red</span> text</div>"#), "red text");
    }

    #[test]
    fn line_breaks() {
        assert_eq!(md("<p>one<br>two</p>"), "one  \ntwo");
    }

    #[test]
    fn comments_and_stray_angles() {
        assert_eq!(md("<!-- note --><p>1 < 2</p>"), "1 < 2");
    }

    #[test]
    fn malformed_tail_does_not_panic() {
        assert_eq!(md("<p>ok<"), "ok<");
        assert_eq!(md("<pre>dangling"), "```\ndangling\n```");
    }
}
