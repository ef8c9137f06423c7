//! Line-oriented layout of a composed document into styled blocks.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Serialize;

use crate::compose::Document;

use super::RenderError;

static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ISSUE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z]{2}[A-Z0-9_]*)-\d+\b").unwrap());

/// Uppercase prefixes that look like issue keys but name standards.
const NOT_ISSUE_PREFIXES: &[&str] = &[
    "AES", "CVE", "HTTP", "ISO", "JDK", "JEP", "JSR", "RFC", "SHA", "SSL", "TLS", "UTF",
];

const LIST_MARKER: &str = "- ";

/// Visual role of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StyleRole {
    Heading1,
    Heading2,
    Body,
    ListItem,
}

/// Font metrics and colour of a role, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub leading: f32,
    pub space_after: f32,
    pub left_indent: f32,
    pub color: (f32, f32, f32),
}

pub const DARK_BLUE: (f32, f32, f32) = (0.0, 0.0, 0.545);
pub const DARK_GREEN: (f32, f32, f32) = (0.0, 0.392, 0.0);
pub const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
/// Colour of emphasized spans.
pub const EMPHASIS_BLUE: (f32, f32, f32) = (0.0, 0.0, 1.0);

/// Height of the break emitted for a blank line.
pub const SPACER_PT: f32 = 4.0;

impl StyleRole {
    pub fn style(&self) -> TextStyle {
        match self {
            StyleRole::Heading1 => TextStyle {
                font_size: 16.0,
                leading: 18.0,
                space_after: 8.0,
                left_indent: 0.0,
                color: DARK_BLUE,
            },
            StyleRole::Heading2 => TextStyle {
                font_size: 12.0,
                leading: 14.0,
                space_after: 6.0,
                left_indent: 0.0,
                color: DARK_GREEN,
            },
            StyleRole::Body => TextStyle {
                font_size: 10.0,
                leading: 12.0,
                space_after: 4.0,
                left_indent: 0.0,
                color: BLACK,
            },
            StyleRole::ListItem => TextStyle {
                font_size: 10.0,
                leading: 12.0,
                space_after: 0.0,
                left_indent: 10.0,
                color: BLACK,
            },
        }
    }
}

/// A run of text, either in the role's colour or emphasized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub emphasis: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: false,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: true,
        }
    }
}

/// One laid-out element, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Block {
    /// Vertical break of [`SPACER_PT`].
    Spacer,
    Text { role: StyleRole, spans: Vec<Span> },
}

impl Block {
    /// Concatenated text of the block (empty for spacers).
    pub fn text(&self) -> String {
        match self {
            Block::Spacer => String::new(),
            Block::Text { spans, .. } => spans.iter().map(|s| s.text.as_str()).collect(),
        }
    }
}

/// Turn a document into ordered styled blocks.
///
/// Each line is handled on its own after trimming. A document without any
/// text is rejected.
pub fn layout_blocks(document: &Document) -> Result<Vec<Block>, RenderError> {
    let blocks: Vec<Block> = document.lines().map(layout_line).collect();

    if !blocks.iter().any(|b| matches!(b, Block::Text { .. })) {
        return Err(RenderError::EmptyDocument);
    }
    Ok(blocks)
}

fn layout_line(line: &str) -> Block {
    let line = line.trim();
    if line.is_empty() {
        return Block::Spacer;
    }

    if let Some(rest) = line.strip_prefix("# ") {
        Block::Text {
            role: StyleRole::Heading1,
            spans: vec![Span::plain(rest)],
        }
    } else if let Some(rest) = line.strip_prefix("## ") {
        Block::Text {
            role: StyleRole::Heading2,
            spans: vec![Span::plain(rest)],
        }
    } else if let Some(rest) = line.strip_prefix(LIST_MARKER) {
        let mut spans = vec![Span::plain(LIST_MARKER)];
        for span in emphasize(rest) {
            if span.emphasis {
                spans.push(span);
            } else {
                spans.extend(highlight_issue_keys(&span.text));
            }
        }
        Block::Text {
            role: StyleRole::ListItem,
            spans: merge_spans(spans),
        }
    } else {
        Block::Text {
            role: StyleRole::Body,
            spans: emphasize(line),
        }
    }
}

/// Replace `**text**` with an emphasized span.
fn emphasize(text: &str) -> Vec<Span> {
    split_matches(text, &EMPHASIS, |caps| caps.get(1).map(|m| m.as_str()))
}

/// Issue keys such as `ZOOKEEPER-4700` in list items are emphasized too.
/// `UTF-8`, `SHA-256` and similar stay plain.
fn highlight_issue_keys(text: &str) -> Vec<Span> {
    split_matches(text, &ISSUE_KEY, |caps| {
        let prefix = caps.get(1)?.as_str();
        if NOT_ISSUE_PREFIXES.contains(&prefix) {
            return None;
        }
        caps.get(0).map(|m| m.as_str())
    })
}

/// Split `text` around regex matches. `inner` picks the emphasized text of a
/// match, or `None` to leave the match as plain text.
fn split_matches<'t>(
    text: &'t str,
    regex: &Regex,
    inner: impl Fn(&regex_lite::Captures<'t>) -> Option<&'t str>,
) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in regex.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(emphasized) = inner(&caps) else { continue };
        if whole.start() > last {
            spans.push(Span::plain(&text[last..whole.start()]));
        }
        spans.push(Span::emphasized(emphasized));
        last = whole.end();
    }
    if last < text.len() {
        spans.push(Span::plain(&text[last..]));
    }
    spans
}

/// Join neighbouring spans with the same emphasis and drop empty ones.
fn merge_spans(spans: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans.into_iter().filter(|s| !s.text.is_empty()) {
        match merged.last_mut() {
            Some(prev) if prev.emphasis == span.emphasis => prev.text.push_str(&span.text),
            _ => merged.push(span),
        }
    }
    merged
}
