//! HTML-to-plain-text extraction for chapter content.
//!
//! The conversion is a depth-first walk over the parsed body: text nodes
//! are appended verbatim, `<br>` becomes a newline, and a closed set of
//! block-level tags gets a paragraph break on both sides of the recursion.
//! A single normalization pass then collapses runs of whitespace.
//!
//! Parsing never fails to the caller: if no structured body can be
//! produced, the markup is sanitized with a strip-all-tags pass instead.

use ego_tree::NodeRef;
use regex::Regex;
use scraper::{Html, Node, Selector};
use tracing::warn;

use crate::book::Chapter;
use crate::{FoliaError, Result};

/// Tags rendered as their own paragraph/block. Closed, enumerated set.
const BLOCK_TAGS: [&str; 19] = [
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "pre",
    "ul",
    "ol",
    "li",
    "table",
    "tr",
    "section",
    "article",
    "header",
    "footer",
];

/// Configuration for plain text extraction.
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Separate block-level content with blank lines. Disabling this yields
    /// the flat variant where block boundaries emit no delimiters.
    pub paragraph_breaks: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { paragraph_breaks: true }
    }
}

/// Extract plain text from a chapter with paragraph breaks enabled.
///
/// # Errors
///
/// Returns [`FoliaError::ContentNotLoaded`] if the chapter's content slot
/// is empty. Blank content yields an empty string, not an error.
pub fn extract_chapter_text(chapter: &Chapter) -> Result<String> {
    extract_chapter_text_with_config(chapter, &TextConfig::default())
}

/// Extract plain text from a chapter with the given configuration.
pub fn extract_chapter_text_with_config(chapter: &Chapter, config: &TextConfig) -> Result<String> {
    let bytes = chapter
        .content
        .as_bytes()
        .ok_or_else(|| FoliaError::ContentNotLoaded(chapter.id.clone()))?;

    let markup = String::from_utf8_lossy(bytes);
    Ok(html_to_text(&markup, config))
}

/// Convert embedded HTML markup to normalized plain text.
///
/// This is a pure function of its input and never fails: malformed markup
/// falls back to a tag-stripping sanitize pass.
pub fn html_to_text(html: &str, config: &TextConfig) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    match structured_text(html, config) {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "Structured markup parsing failed, stripping tags instead");
            normalize_whitespace(&strip_tags(html))
        }
    }
}

/// Walk the parsed body and accumulate text with block separation.
fn structured_text(html: &str, config: &TextConfig) -> Result<String> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("body").map_err(|e| FoliaError::HtmlParse(format!("Invalid selector: {}", e)))?;
    let body = document
        .select(&selector)
        .next()
        .ok_or_else(|| FoliaError::HtmlParse("document has no body".to_string()))?;

    let mut output = String::new();
    for child in body.children() {
        walk(child, config, &mut output);
    }

    Ok(normalize_whitespace(&output))
}

fn walk(node: NodeRef<'_, Node>, config: &TextConfig, output: &mut String) {
    match node.value() {
        Node::Text(text) => {
            // Purely-whitespace nodes are inter-tag formatting, not content.
            if !text.trim().is_empty() {
                output.push_str(&text);
            }
        }
        Node::Element(element) => {
            let name = element.name().to_ascii_lowercase();
            if name == "br" {
                output.push('\n');
                return;
            }
            if name == "script" || name == "style" {
                return;
            }

            let block = config.paragraph_breaks && BLOCK_TAGS.contains(&name.as_str());
            if block {
                ensure_paragraph_break(output);
            }
            for child in node.children() {
                walk(child, config, output);
            }
            if block {
                ensure_paragraph_break(output);
            }
        }
        _ => {}
    }
}

/// Make the accumulated text end with a double newline, unless it is empty.
///
/// Applied on both sides of block recursion so paragraph separation does
/// not depend on which side emits first.
fn ensure_paragraph_break(output: &mut String) {
    if output.is_empty() || output.ends_with("\n\n") {
        return;
    }
    if output.ends_with('\n') {
        output.push('\n');
    } else {
        output.push_str("\n\n");
    }
}

/// No-tags-allowed sanitize pass used when structured parsing fails.
fn strip_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Collapse space runs, strip spaces adjacent to newlines, cap blank lines
/// at one, and trim the ends.
fn normalize_whitespace(text: &str) -> String {
    let spaces = Regex::new(r"[ \t]{2,}").unwrap();
    let around_newlines = Regex::new(r"[ \t]*\n[ \t]*").unwrap();
    let newlines = Regex::new(r"\n{3,}").unwrap();

    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = spaces.replace_all(&text, " ");
    let text = around_newlines.replace_all(&text, "\n");
    let text = newlines.replace_all(&text, "\n\n");

    text.trim().to_string()
}
