//! Burn-in strategy trait and supporting types.
//!
//! This module defines the abstraction over how masks end up in a PDF,
//! allowing different writers to sit behind [`super::RedactionService`].

use crate::domain::RedactionMask;
use crate::error::RedactorResult;
use std::io::Write;

/// Statistics about a burn-in operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BurnReport {
    /// Pages in the source document
    pub pages_processed: usize,

    /// Pages that received at least one mask
    pub pages_modified: usize,

    /// Masks drawn into the output
    pub masks_drawn: usize,

    /// Masks dropped because their page does not exist
    pub masks_skipped: usize,
}

impl BurnReport {
    /// Returns true if any mask was drawn.
    pub fn has_redactions(&self) -> bool {
        self.masks_drawn > 0
    }
}

/// Strategy for burning redaction masks into a PDF.
pub trait RedactionStrategy: Send + Sync {
    /// Draws `masks` into the PDF in `input` and writes the result to `output`.
    ///
    /// # Arguments
    /// * `input` - Bytes of the original PDF
    /// * `masks` - Masks in top-left-origin page space
    /// * `output` - Sink receiving the complete new PDF
    fn burn(
        &self,
        input: &[u8],
        masks: &[RedactionMask],
        output: &mut dyn Write,
    ) -> RedactorResult<BurnReport>;

    /// Returns a human-readable name for this strategy.
    fn name(&self) -> &str;

    /// Returns whether the covered text is removed from the content streams.
    fn removes_text(&self) -> bool;
}
