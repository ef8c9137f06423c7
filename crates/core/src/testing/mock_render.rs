//! Mock render backend for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::render::{Block, RenderBackend, RenderError};

/// Backend that emits the block texts as plain bytes, or fails on demand.
#[derive(Debug, Default)]
pub struct MockRenderBackend {
    fail: AtomicBool,
    renders: AtomicUsize,
}

impl MockRenderBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose every render fails.
    pub fn failing() -> Self {
        let backend = Self::default();
        backend.fail.store(true, Ordering::SeqCst);
        backend
    }

    /// Number of render calls made.
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl RenderBackend for MockRenderBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn content_type(&self) -> &str {
        "text/plain"
    }

    fn render(&self, _title: &str, blocks: &[Block]) -> Result<Vec<u8>, RenderError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(RenderError::Backend("mock render failure".to_string()));
        }
        let text = blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(text.into_bytes())
    }
}
