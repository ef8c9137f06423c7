//! PDF backend built on printpdf's builtin Helvetica.
//!
//! Word wrapping uses approximate Helvetica advance widths; pagination starts
//! a new page whenever the next line would cross the bottom margin.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};
use tracing::debug;

use super::layout::{Block, Span, TextStyle, EMPHASIS_BLUE, SPACER_PT};
use super::{RenderBackend, RenderError};

const LAYER_NAME: &str = "Layer 1";

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// US Letter with 50pt margins on every side.
    pub const LETTER: PageGeometry = PageGeometry {
        width: 612.0,
        height: 792.0,
        margin: 50.0,
    };

    fn text_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn top(&self) -> f32 {
        self.height - self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::LETTER
    }
}

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn backend_error(e: impl std::fmt::Debug) -> RenderError {
    RenderError::Backend(format!("{:?}", e))
}

/// Renders blocks to PDF bytes.
///
/// Text is set in the builtin Helvetica, which only covers WinAnsi
/// (Latin-1 plus a few typographic marks). Other characters, such as emoji
/// and CJK text, are left out of the page; each affected line is logged at
/// debug level.
#[derive(Debug, Clone, Default)]
pub struct PdfBackend {
    geometry: PageGeometry,
}

impl PdfBackend {
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }
}

impl RenderBackend for PdfBackend {
    fn name(&self) -> &str {
        "pdf"
    }

    fn content_type(&self) -> &str {
        "application/pdf"
    }

    fn render(&self, title: &str, blocks: &[Block]) -> Result<Vec<u8>, RenderError> {
        let geometry = self.geometry;
        let (doc, page, layer) = PdfDocument::new(
            title,
            mm(geometry.width),
            mm(geometry.height),
            LAYER_NAME,
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(backend_error)?;

        let mut writer = PageWriter {
            doc: &doc,
            font: &font,
            geometry,
            layer: doc.get_page(page).get_layer(layer),
            cursor: geometry.top(),
            pages: 1,
        };

        for block in blocks {
            match block {
                Block::Spacer => writer.cursor -= SPACER_PT,
                Block::Text { role, spans } => {
                    log_unencodable(spans);
                    let style = role.style();
                    let width = geometry.text_width() - style.left_indent;
                    for line in wrap_spans(spans, style.font_size, width) {
                        writer.write_line(&style, &line);
                    }
                    writer.cursor -= style.space_after;
                }
            }
        }

        debug!("Rendered {} blocks on {} page(s)", blocks.len(), writer.pages);

        doc.save_to_bytes().map_err(backend_error)
    }
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    font: &'a IndirectFontRef,
    geometry: PageGeometry,
    layer: PdfLayerReference,
    /// Top of the next line, in points from the page bottom.
    cursor: f32,
    pages: usize,
}

impl PageWriter<'_> {
    fn write_line(&mut self, style: &TextStyle, spans: &[Span]) {
        if self.cursor - style.leading < self.geometry.margin {
            self.new_page();
        }

        let baseline = self.cursor - style.font_size;
        self.layer.begin_text_section();
        self.layer.set_font(self.font, style.font_size);
        self.layer.set_text_cursor(
            mm(self.geometry.margin + style.left_indent),
            mm(baseline),
        );
        for span in spans {
            let (r, g, b) = if span.emphasis {
                EMPHASIS_BLUE
            } else {
                style.color
            };
            self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
            self.layer.write_text(span.text.clone(), self.font);
        }
        self.layer.end_text_section();

        self.cursor -= style.leading;
    }

    fn new_page(&mut self) {
        let (page, layer) =
            self.doc
                .add_page(mm(self.geometry.width), mm(self.geometry.height), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = self.geometry.top();
        self.pages += 1;
    }
}

/// Advance width of a character in Helvetica, per 1000 units of font size.
fn char_width(c: char) -> u32 {
    match c {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | 'I' | '[' | ']' | 'f' | 't' => 278,
        '\'' | 'i' | 'j' | 'l' => 222,
        '(' | ')' | '-' | '`' | 'r' => 333,
        '0'..='9' | 'a'..='z' | '_' | '$' | '?' => match c {
            'm' => 833,
            'w' => 722,
            'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500,
            _ => 556,
        },
        'A'..='Z' => match c {
            'M' => 833,
            'W' => 944,
            'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722,
            'G' | 'O' | 'Q' => 778,
            'F' | 'T' | 'Z' => 611,
            'J' => 500,
            'L' => 556,
            _ => 667,
        },
        '@' => 1015,
        '%' => 889,
        _ => 556,
    }
}

fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width).sum::<u32>() as f32 * font_size / 1000.0
}

/// Whether Helvetica's WinAnsi encoding has a glyph for `c`.
fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{a0}'..='\u{ff}')
        || matches!(
            c,
            '\u{20ac}' | '\u{201a}' | '\u{0192}' | '\u{201e}' | '\u{2026}' | '\u{2020}'
                | '\u{2021}' | '\u{02c6}' | '\u{2030}' | '\u{0160}' | '\u{2039}'
                | '\u{0152}' | '\u{017d}' | '\u{2018}' | '\u{2019}' | '\u{201c}'
                | '\u{201d}' | '\u{2022}' | '\u{2013}' | '\u{2014}' | '\u{02dc}'
                | '\u{2122}' | '\u{0161}' | '\u{203a}' | '\u{0153}' | '\u{017e}'
                | '\u{0178}'
        )
}

fn unencodable_chars(spans: &[Span]) -> String {
    spans
        .iter()
        .flat_map(|s| s.text.chars())
        .filter(|c| !c.is_whitespace() && !is_win_ansi(*c))
        .collect()
}

fn log_unencodable(spans: &[Span]) {
    let missing = unencodable_chars(spans);
    if !missing.is_empty() {
        let text: String = spans.iter().map(|s| s.text.as_str()).collect();
        debug!(
            missing = %missing,
            "Helvetica cannot encode characters in '{}'; they will be omitted",
            text
        );
    }
}

/// Break styled spans into lines no wider than `max_width` points.
///
/// Words are split on whitespace and rejoined with single spaces. A word
/// wider than the line is placed alone and allowed to overflow.
fn wrap_spans(spans: &[Span], font_size: f32, max_width: f32) -> Vec<Vec<Span>> {
    // Words as runs of (char, emphasis); emphasis may change inside a word.
    let mut words: Vec<Vec<(char, bool)>> = Vec::new();
    let mut current: Vec<(char, bool)> = Vec::new();
    for span in spans {
        for c in span.text.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else {
                current.push((c, span.emphasis));
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let space = text_width(" ", font_size);
    let mut lines: Vec<Vec<(char, bool)>> = Vec::new();
    let mut line: Vec<(char, bool)> = Vec::new();
    let mut line_width = 0.0;

    for word in words {
        let word_width = word.iter().map(|(c, _)| char_width(*c)).sum::<u32>() as f32
            * font_size
            / 1000.0;
        if !line.is_empty() && line_width + space + word_width > max_width {
            lines.push(std::mem::take(&mut line));
            line_width = 0.0;
        }
        if !line.is_empty() {
            let emphasis = line.last().map(|(_, e)| *e).unwrap_or(false);
            line.push((' ', emphasis));
            line_width += space;
        }
        line.extend(word);
        line_width += word_width;
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines.into_iter().map(|chars| to_spans(&chars)).collect()
}

fn to_spans(chars: &[(char, bool)]) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    for &(c, emphasis) in chars {
        match spans.last_mut() {
            Some(span) if span.emphasis == emphasis => span.text.push(c),
            _ => spans.push(Span {
                text: c.to_string(),
                emphasis,
            }),
        }
    }
    spans
}
