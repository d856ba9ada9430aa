//! Sanitizing Markdown pipeline.
//!
//! Every piece of record content is attacker/model-controlled, so nothing
//! reaches the visible tree without passing through the sanitizer. Two
//! conversions are offered: full HTML rendering for item bodies and plain
//! text for one-line previews. Bodies are segmented at fenced code blocks so
//! syntax highlighting can run lazily, once per block, only when an item is
//! actually expanded.

use once_cell::sync::Lazy;
use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Matches anything that already looks like HTML rather than Markdown.
static RE_HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<[a-z].*>").unwrap());

/// Collapses trailing spaces/tabs before a newline.
static RE_TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());

/// Blank-line paragraph separator.
static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// A rendered-but-unhighlighted code block embedded in an HTML segment (a
/// block nested inside a list or blockquote). Highlighter output does not
/// match this shape, so in-place highlighting never reprocesses a block.
static RE_EMBEDDED_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<pre><code(?: class="language-([^"]*)")?>(.*?)</code></pre>"#).unwrap()
});

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

static THEME: Lazy<Theme> = Lazy::new(|| {
    let mut themes = ThemeSet::load_defaults().themes;
    themes
        .remove("InspiredGitHub")
        .unwrap_or_else(Theme::default)
});

/// Allow-list sanitizer. Scripts, event handlers, and unknown tags are
/// dropped silently; `class` survives on `code` so language tags reach the
/// highlighter.
static SANITIZER: Lazy<ammonia::Builder<'static>> = Lazy::new(|| {
    let mut builder = ammonia::Builder::default();
    builder.add_tag_attributes("code", ["class"]);
    builder
});

fn markdown_options() -> Options {
    // GitHub-flavored set; line breaks stay soft and headers get no ids.
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, markdown_options());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn sanitize(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

/// Converts untrusted Markdown into HTML safe for direct insertion.
pub fn render_safe_html(markdown: &str) -> String {
    sanitize(&markdown_to_html(markdown))
}

// ─────────────────────────────────────────────────────────────────────────────
// Segmented bodies and lazy highlighting
// ─────────────────────────────────────────────────────────────────────────────

/// One fenced or indented code block, highlighted at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub source: String,
    /// Highlighter output; `Some` marks the block as processed.
    pub highlighted: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodySegment {
    /// Sanitized HTML, ready for insertion.
    Html(String),
    Code(CodeBlock),
}

/// An item body: sanitized prose interleaved with code blocks that are
/// highlighted on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedBody {
    pub segments: Vec<BodySegment>,
}

impl RenderedBody {
    /// Serializes the body. Unhighlighted code renders as an escaped
    /// `language-`-classed block; highlighted code uses the highlighter's
    /// own markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                BodySegment::Html(html) => out.push_str(html),
                BodySegment::Code(block) => match &block.highlighted {
                    Some(html) => out.push_str(html),
                    None => out.push_str(&escaped_code_html(block)),
                },
            }
        }
        out
    }

    pub fn has_unhighlighted_code(&self) -> bool {
        self.segments.iter().any(|segment| match segment {
            BodySegment::Code(block) => block.highlighted.is_none(),
            BodySegment::Html(html) => RE_EMBEDDED_CODE.is_match(html),
        })
    }
}

fn escaped_code_html(block: &CodeBlock) -> String {
    let class = match &block.language {
        Some(lang) => format!(" class=\"language-{}\"", lang),
        None => String::new(),
    };
    format!(
        "<pre><code{}>{}</code></pre>\n",
        class,
        html_escape::encode_text(&block.source)
    )
}

fn language_token(raw: &str) -> Option<String> {
    let token: String = raw
        .split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'))
        .collect();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Renders a Markdown body into sanitized segments, splitting out top-level
/// code blocks so they can be highlighted later without reprocessing the
/// prose. A block nested inside a list, blockquote, or other container must
/// stay inside that container's markup, so it renders inline with its
/// segment and is highlighted in place instead (see [`highlight_body`]).
pub fn render_body(markdown: &str) -> RenderedBody {
    fn flush_pending<'a>(pending: &mut Vec<Event<'a>>, segments: &mut Vec<BodySegment>) {
        if pending.is_empty() {
            return;
        }
        let mut raw = String::new();
        html::push_html(&mut raw, pending.drain(..));
        segments.push(BodySegment::Html(sanitize(&raw)));
    }

    let mut segments = Vec::new();
    let mut pending: Vec<Event<'_>> = Vec::new();
    let mut code: Option<CodeBlock> = None;
    // Open container depth. Only depth-0 code blocks become segments of
    // their own; splitting deeper would tear the container's tags apart.
    let mut depth = 0usize;

    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) if depth == 0 => {
                flush_pending(&mut pending, &mut segments);
                let language = match &kind {
                    CodeBlockKind::Fenced(info) => language_token(info),
                    CodeBlockKind::Indented => None,
                };
                code = Some(CodeBlock {
                    language,
                    source: String::new(),
                    highlighted: None,
                });
            }
            Event::End(TagEnd::CodeBlock) if code.is_some() => {
                if let Some(block) = code.take() {
                    segments.push(BodySegment::Code(block));
                }
            }
            Event::Text(text) if code.is_some() => {
                if let Some(block) = code.as_mut() {
                    block.source.push_str(&text);
                }
            }
            Event::Start(tag) => {
                depth += 1;
                pending.push(Event::Start(tag));
            }
            Event::End(tag) => {
                depth = depth.saturating_sub(1);
                pending.push(Event::End(tag));
            }
            other => pending.push(other),
        }
    }
    flush_pending(&mut pending, &mut segments);

    RenderedBody { segments }
}

/// Highlights every not-yet-processed code block in place.
///
/// Idempotent per block: once `highlighted` is set the block is never
/// reprocessed, and code embedded in an HTML segment is rewritten into
/// highlighter markup that no longer matches the embedded pattern. A
/// highlighter failure leaves the escaped fallback in place.
pub fn highlight_body(body: &mut RenderedBody) {
    for segment in &mut body.segments {
        match segment {
            BodySegment::Code(block) => {
                if block.highlighted.is_some() {
                    continue;
                }
                if let Some(html) = highlight_source(block.language.as_deref(), &block.source) {
                    block.highlighted = Some(html);
                }
            }
            BodySegment::Html(html) => {
                if !RE_EMBEDDED_CODE.is_match(html) {
                    continue;
                }
                *html = RE_EMBEDDED_CODE
                    .replace_all(html, |caps: &regex::Captures<'_>| {
                        let language = caps.get(1).map(|m| m.as_str()).filter(|l| !l.is_empty());
                        let source = html_escape::decode_html_entities(&caps[2]).to_string();
                        highlight_source(language, &source).unwrap_or_else(|| caps[0].to_string())
                    })
                    .to_string();
            }
        }
    }
}

fn highlight_source(language: Option<&str>, source: &str) -> Option<String> {
    let syntax = language
        .and_then(|lang| SYNTAX_SET.find_syntax_by_token(lang))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    match highlighted_html_for_string(source, &SYNTAX_SET, syntax, &THEME) {
        Ok(html) => Some(html),
        Err(err) => {
            tracing::warn!(error = %err, language = ?language, "Highlighting failed");
            // Leave the block unhighlighted; the escaped fallback renders.
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plain-text previews
// ─────────────────────────────────────────────────────────────────────────────

/// Converts Markdown or HTML into sanitized plain text.
///
/// Input that already looks like HTML skips the Markdown parser. Tags are
/// stripped after sanitization, entities decoded, non-breaking spaces
/// normalized, and trailing whitespace before newlines trimmed.
pub fn to_plain_text(input: &str) -> String {
    let html = if RE_HTML_TAG.is_match(input) {
        input.to_string()
    } else {
        markdown_to_html(input)
    };
    let text = strip_tags(&sanitize(&html));
    let text = html_escape::decode_html_entities(&text).replace('\u{a0}', " ");
    RE_TRAILING_WS.replace_all(&text, "\n").trim().to_string()
}

/// First two blank-line-separated paragraphs, for preview fallback when a
/// record carries no short summary.
pub fn preview_source(markdown: &str) -> String {
    RE_PARAGRAPH_BREAK
        .split(markdown)
        .take(2)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = render_safe_html("# Heading\n\nSome **bold** text.");
        assert!(html.contains("<h1>Heading</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn strips_script_tags() {
        let html = render_safe_html("hello <script>alert('xss')</script> world");
        assert!(!html.contains("<script"));
        assert!(html.contains("hello"));
    }

    #[test]
    fn strips_event_handlers() {
        let html = render_safe_html(r#"<a href="https://example.com" onclick="steal()">link</a>"#);
        assert!(!html.contains("onclick"));
        assert!(html.contains("link"));
    }

    #[test]
    fn soft_breaks_stay_soft() {
        let html = render_safe_html("line one\nline two");
        assert!(!html.contains("<br"));
    }

    #[test]
    fn fenced_code_keeps_language_class() {
        let html = render_safe_html("```rust\nfn main() {}\n```");
        assert!(html.contains("language-rust"), "got: {}", html);
    }

    #[test]
    fn body_splits_out_code_blocks() {
        let body = render_body("before\n\n```rust\nfn main() {}\n```\n\nafter");
        let kinds: Vec<bool> = body
            .segments
            .iter()
            .map(|s| matches!(s, BodySegment::Code(_)))
            .collect();
        assert_eq!(kinds, vec![false, true, false]);
        assert!(body.has_unhighlighted_code());
    }

    #[test]
    fn code_inside_blockquote_stays_in_blockquote() {
        let body = render_body("> quote\n>\n> ```\n> code here\n> ```\n>\n> tail");
        assert_eq!(body.segments.len(), 1, "container must not be split");
        let html = body.to_html();
        let open = html.find("<blockquote>").unwrap();
        let close = html.rfind("</blockquote>").unwrap();
        let pre = html.find("<pre><code").unwrap();
        let tail = html.find("tail").unwrap();
        assert!(open < pre && pre < close, "got: {}", html);
        assert!(tail < close, "got: {}", html);
    }

    #[test]
    fn code_inside_list_keeps_list_structure() {
        let body = render_body("- first\n\n  ```rust\n  let x = 1;\n  ```\n\n- second");
        let html = body.to_html();
        let close = html.rfind("</ul>").unwrap();
        let pre = html.find("<pre><code").unwrap();
        let second = html.find("second").unwrap();
        assert!(pre < close, "got: {}", html);
        assert!(second < close, "no list item may escape the list: {}", html);
    }

    #[test]
    fn nested_code_is_highlighted_in_place() {
        let mut body = render_body("> ```rust\n> let x = 1;\n> ```");
        assert!(body.has_unhighlighted_code());

        highlight_body(&mut body);
        assert!(!body.has_unhighlighted_code());
        let html = body.to_html();
        assert!(html.contains("<blockquote>"), "got: {}", html);
        assert!(!html.contains("<pre><code"), "got: {}", html);

        let mut again = body.clone();
        highlight_body(&mut again);
        assert_eq!(again.to_html(), html);
    }

    #[test]
    fn unhighlighted_body_renders_escaped_code() {
        let body = render_body("```\n<danger>\n```");
        let html = body.to_html();
        assert!(html.contains("&lt;danger&gt;"));
        assert!(!html.contains("<danger>"));
    }

    #[test]
    fn highlight_is_idempotent_per_block() {
        let mut body = render_body("```rust\nlet x = 1;\n```");
        highlight_body(&mut body);
        let BodySegment::Code(block) = &body.segments[0] else {
            panic!("expected code segment");
        };
        let first = block.highlighted.clone();
        assert!(first.is_some());
        assert!(!body.has_unhighlighted_code());

        highlight_body(&mut body);
        let BodySegment::Code(block) = &body.segments[0] else {
            panic!("expected code segment");
        };
        assert_eq!(block.highlighted, first);
    }

    #[test]
    fn unknown_language_falls_back_to_plain_text() {
        let mut body = render_body("```no-such-lang-xyz\nwords\n```");
        highlight_body(&mut body);
        assert!(!body.has_unhighlighted_code());
    }

    #[test]
    fn plain_text_from_markdown() {
        let text = to_plain_text("Some **bold** and `code`.");
        assert_eq!(text, "Some bold and code.");
    }

    #[test]
    fn plain_text_detects_html_input() {
        let text = to_plain_text("<p>already <em>html</em></p>");
        assert_eq!(text, "already html");
    }

    #[test]
    fn plain_text_normalizes_nbsp_and_trailing_ws() {
        let text = to_plain_text("a\u{a0}b   \nnext");
        assert_eq!(text, "a b\nnext");
    }

    #[test]
    fn preview_takes_first_two_paragraphs() {
        let md = "Para one.\n\nPara two.\n\nPara three.";
        assert_eq!(preview_source(md), "Para one.\n\nPara two.");
        assert_eq!(to_plain_text(&preview_source(md)), "Para one.\nPara two.");
    }

    #[test]
    fn preview_of_short_content_is_unchanged() {
        assert_eq!(preview_source("only one paragraph"), "only one paragraph");
    }
}
