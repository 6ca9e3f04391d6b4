//! HTML document loading
//!
//! Payloads arrive as raw bytes or text from whatever fetched them. Before
//! parsing, escape artifacts from double-encoded bodies are stripped and
//! literal line breaks/tabs are collapsed so cell text stays stable.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{Error, Result};

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| {
    // Literal CR/LF/TAB runs, not the escaped two-char forms
    Regex::new(r"[\r\n\t]+").expect("static regex")
});

/// Parsed, read-only HTML document
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a raw byte payload. Bytes must be valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::parse(format!("Invalid UTF-8 in HTML content: {}", e)))?;
        Self::from_text(text)
    }

    /// Normalize and parse a text payload
    pub fn from_text(text: &str) -> Result<Self> {
        let normalized = normalize(text);
        if normalized.trim().is_empty() {
            return Err(Error::parse("empty document"));
        }

        let html = Html::parse_document(&normalized);
        debug!(
            bytes = normalized.len(),
            recovered_errors = html.errors.len(),
            "parsed document"
        );

        Ok(Self { html })
    }

    /// First element matching a CSS selector
    pub fn select_first(&self, selector: &str) -> Result<Option<ElementRef<'_>>> {
        let sel = Selector::parse(selector).map_err(|e| Error::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.html.select(&sel).next())
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

/// Strip escape artifacts and collapse literal line breaks.
///
/// - `\r` and `\n` written as backslash + letter are removed
/// - `\"` becomes `"`
/// - runs of real CR/LF/TAB become one space
pub fn normalize(text: &str) -> String {
    let unescaped = text
        .replace("\\r", "")
        .replace("\\n", "")
        .replace("\\\"", "\"");
    LINE_BREAKS.replace_all(&unescaped, " ").into_owned()
}

/// Text content of an element with whitespace collapsed
pub fn element_text(el: ElementRef<'_>) -> String {
    let text = el.text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
