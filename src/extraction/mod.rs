//! Text layout extraction.
//!
//! Turns a page's rendered text into [`TextRun`]s that carry per-glyph
//! positions. The PDF library does the content-stream walking; this module
//! does the positional bookkeeping and box aggregation.
//!
//! Every extraction call builds its own [`TextRunCollector`], so no run
//! state survives from one page or call to the next.

pub mod mupdf_layout;

pub use mupdf_layout::MupdfLayout;

use crate::domain::{GlyphPosition, QuarterTurn, TextRun};
use crate::error::{RedactorError, RedactorResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A document whose pages can be turned into positioned text runs.
pub trait LayoutSource {
    /// Number of pages in the document.
    fn page_count(&self) -> RedactorResult<usize>;

    /// Text runs of one page, in emission order.
    ///
    /// Page indices past the end yield an empty vector, not an error.
    fn page_runs(&self, page_index: usize) -> RedactorResult<Vec<TextRun>>;
}

/// Runs that were extracted ahead of time, one vector per page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreparedLayout {
    pub pages: Vec<Vec<TextRun>>,
}

impl PreparedLayout {
    pub fn new(pages: Vec<Vec<TextRun>>) -> Self {
        Self { pages }
    }
}

impl LayoutSource for PreparedLayout {
    fn page_count(&self) -> RedactorResult<usize> {
        Ok(self.pages.len())
    }

    fn page_runs(&self, page_index: usize) -> RedactorResult<Vec<TextRun>> {
        Ok(self.pages.get(page_index).cloned().unwrap_or_default())
    }
}

/// Accumulates glyphs into runs for a single extraction call.
#[derive(Debug, Default)]
pub struct TextRunCollector {
    runs: Vec<TextRun>,
    text: String,
    glyphs: Vec<GlyphPosition>,
    turn: QuarterTurn,
}

impl TextRunCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a glyph to the current run.
    ///
    /// Typographic ligatures are written to the run text expanded while
    /// keeping their single glyph position, so the run no longer has one
    /// glyph per character and coordinates for it get estimated.
    pub fn push_glyph(&mut self, ch: char, glyph: GlyphPosition) {
        match expand_ligature(ch) {
            Some(expanded) => self.text.push_str(expanded),
            None => self.text.push(ch),
        }
        self.glyphs.push(glyph);
    }

    /// Sets the page-space turn of the current run. Glyphs pushed to it
    /// are expected in the run's upright frame.
    pub fn set_turn(&mut self, turn: QuarterTurn) {
        self.turn = turn;
    }

    /// Closes the current run. Runs without visible text are dropped.
    pub fn end_run(&mut self) {
        let text = std::mem::take(&mut self.text);
        let glyphs = std::mem::take(&mut self.glyphs);
        let turn = std::mem::take(&mut self.turn);

        if text.trim().is_empty() {
            return;
        }
        if let Some(run) = TextRun::from_glyphs(text, glyphs) {
            self.runs.push(run.with_turn(turn));
        }
    }

    /// Closes any open run and returns everything collected.
    pub fn finish(mut self) -> Vec<TextRun> {
        self.end_run();
        self.runs
    }
}

/// Replacement text for the Unicode Alphabetic Presentation Forms ligatures.
pub fn expand_ligature(ch: char) -> Option<&'static str> {
    match ch {
        '\u{FB00}' => Some("ff"),
        '\u{FB01}' => Some("fi"),
        '\u{FB02}' => Some("fl"),
        '\u{FB03}' => Some("ffi"),
        '\u{FB04}' => Some("ffl"),
        '\u{FB05}' | '\u{FB06}' => Some("st"),
        _ => None,
    }
}

/// Extracts the plain text of a whole document.
pub fn extract_text(input: &Path) -> RedactorResult<String> {
    let bytes = std::fs::read(input).map_err(|e| RedactorError::Io {
        path: input.to_path_buf(),
        source: e,
    })?;

    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| RedactorError::TextExtraction {
        path: input.to_path_buf(),
        reason: e.to_string(),
    })
}
