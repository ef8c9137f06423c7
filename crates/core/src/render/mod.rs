//! Rendering of a composed document into a paginated artifact.
//!
//! Layout is split from output: [`layout_blocks`] maps each document line to
//! a styled [`Block`], and a [`RenderBackend`] flows those blocks onto pages.

mod layout;
mod pdf;

pub use layout::{
    layout_blocks, Block, Span, StyleRole, TextStyle, BLACK, DARK_BLUE, DARK_GREEN,
    EMPHASIS_BLUE, SPACER_PT,
};
pub use pdf::{PageGeometry, PdfBackend};

use thiserror::Error;

use crate::compose::Document;

/// Errors raised while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document contains no text lines.
    #[error("document has no content to render")]
    EmptyDocument,

    /// The output backend failed.
    #[error("render backend failed: {0}")]
    Backend(String),
}

/// Output format backend. Owns pagination and text flow.
pub trait RenderBackend: Send + Sync {
    /// Name of this backend for logging.
    fn name(&self) -> &str;

    /// MIME type of the produced bytes.
    fn content_type(&self) -> &str;

    /// Render ordered blocks into artifact bytes.
    fn render(&self, title: &str, blocks: &[Block]) -> Result<Vec<u8>, RenderError>;
}

/// Lay out and render a document with the given backend.
///
/// The first level-1 heading becomes the artifact title.
pub fn render_document(
    document: &Document,
    backend: &dyn RenderBackend,
) -> Result<Vec<u8>, RenderError> {
    let blocks = layout_blocks(document)?;
    let title = blocks
        .iter()
        .find_map(|b| match b {
            Block::Text {
                role: StyleRole::Heading1,
                ..
            } => Some(b.text()),
            _ => None,
        })
        .unwrap_or_else(|| "Release Notes".to_string());

    backend.render(&title, &blocks)
}
