// src/document.rs
// =============================================================================
// Wraps a parsed HTML page so the checks can query it.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// The wrapper adds three things on top of scraper:
// - a minimum-size gate before parsing (tiny bodies are usually error pages)
// - selector errors surface as DocumentError instead of panicking
// - visible-text extraction that skips <script>, <style> and friends
// =============================================================================

use scraper::{ElementRef, Html, Node, Selector};
use thiserror::Error;

/// Bodies shorter than this are rejected before parsing.
pub const MIN_CONTENT_CHARS: usize = 100;

// Elements whose text never reaches a reader
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("content too short ({0} characters)")]
    MinimalContent(usize),

    #[error("malformed markup: {0}")]
    Malformed(String),

    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },
}

pub struct Document {
    html: Html,
}

impl Document {
    // Parses a page body into a queryable document
    //
    // Returns:
    //   MinimalContent when the body is under MIN_CONTENT_CHARS characters
    //   Malformed when the body contains no markup the parser could use
    pub fn parse(body: &str) -> Result<Self, DocumentError> {
        let length = body.trim().chars().count();
        if length < MIN_CONTENT_CHARS {
            return Err(DocumentError::MinimalContent(length));
        }

        if !body.contains('<') {
            return Err(DocumentError::Malformed("no HTML tags found".to_string()));
        }

        let html = Html::parse_document(body);

        // html5ever recovers from almost anything; if recovery left us with
        // nothing but the synthesized skeleton the input was not a page
        let has_elements = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .any(|element| !matches!(element.value().name(), "html" | "head" | "body"));
        if !has_elements && !html.errors.is_empty() {
            return Err(DocumentError::Malformed(html.errors.join("; ")));
        }

        Ok(Self { html })
    }

    /// All elements matching a CSS selector, in document order.
    pub fn select(&self, css: &str) -> Result<Vec<ElementRef<'_>>, DocumentError> {
        let selector = compile(css)?;
        Ok(self.html.select(&selector).collect())
    }

    pub fn first(&self, css: &str) -> Result<Option<ElementRef<'_>>, DocumentError> {
        let selector = compile(css)?;
        Ok(self.html.select(&selector).next())
    }

    pub fn count(&self, css: &str) -> Result<usize, DocumentError> {
        let selector = compile(css)?;
        Ok(self.html.select(&selector).count())
    }

    pub fn exists(&self, css: &str) -> Result<bool, DocumentError> {
        Ok(self.first(css)?.is_some())
    }

    /// Trimmed attribute value of the first match, if any.
    pub fn attr(&self, css: &str, name: &str) -> Result<Option<String>, DocumentError> {
        Ok(self
            .first(css)?
            .and_then(|element| element.value().attr(name))
            .map(|value| value.trim().to_string()))
    }

    /// Attribute of the <html> element.
    pub fn root_attr(&self, name: &str) -> Option<&str> {
        self.html.root_element().value().attr(name)
    }

    /// Visible text of the <body> (whole document when there is no body).
    pub fn text(&self) -> Result<String, DocumentError> {
        Ok(match self.first("body")? {
            Some(body) => visible_text(body),
            None => visible_text(self.html.root_element()),
        })
    }

    /// Inner source of all inline <script> blocks plus their src attributes.
    pub fn scripts(&self) -> Result<Vec<String>, DocumentError> {
        Ok(self
            .select("script")?
            .into_iter()
            .map(|script| {
                let src = script.value().attr("src").unwrap_or_default();
                format!("{} {}", src, script.text().collect::<String>())
            })
            .collect())
    }
}

// Collects the visible text under an element, separated by spaces
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(inner) if !INVISIBLE_TAGS.contains(&inner.name()) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

/// Text content of an element with whitespace collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Counts whitespace-separated tokens longer than two characters.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .count()
}

fn compile(css: &str) -> Result<Selector, DocumentError> {
    Selector::parse(css).map_err(|e| DocumentError::Selector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does select() return Vec<ElementRef<'_>>?
//    - ElementRef borrows from the parsed Html
//    - The '_ lifetime ties each element to the Document it came from
//    - The compiler stops us from using an element after the Document is gone
//
// 2. Why is Document never sent to another thread?
//    - scraper's Html uses non-thread-safe reference counting inside
//    - So it is not Send, and cannot be held across an .await in a server task
//    - We parse, use and drop it inside plain (non-async) functions
// -----------------------------------------------------------------------------
