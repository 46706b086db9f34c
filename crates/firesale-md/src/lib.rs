#![forbid(unsafe_code)]

//! Native egui rendering of the markdown preview.
//!
//! The preview mirrors what "Save as HTML" writes: both go through
//! [`firesale_core::markdown::parser`], so the same extensions are on.

mod parse;
mod render;

/// Cached preview of one document.
///
/// Parsing happens only when the document revision moves, not every frame.
#[derive(Debug, Default)]
pub struct Preview {
    revision: Option<u64>,
    blocks: Vec<parse::Block>,
}

impl Preview {
    /// Re-parse `source` if `revision` differs from the last one seen.
    /// Returns whether anything was re-parsed.
    pub fn sync(&mut self, revision: u64, source: &str) -> bool {
        if self.revision == Some(revision) {
            return false;
        }
        self.blocks = parse::parse(source);
        self.revision = Some(revision);
        true
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        render::show(ui, &self.blocks);
    }
}
