//! MuPDF-backed layout source.
//!
//! MuPDF's structured text gives every character its pen origin (on the
//! baseline) and its quad, in top-left-origin page space with the page's
//! `/Rotate` already applied. Each structured text line becomes one
//! [`TextRun`]; lines that run sideways or upside down are measured in
//! their upright frame and tagged with their turn.

use super::{LayoutSource, TextRunCollector};
use crate::domain::{GlyphPosition, QuarterTurn, TextRun};
use crate::error::{RedactorError, RedactorResult};
use std::path::{Path, PathBuf};

use mupdf::{Document, TextPageOptions};

/// An open document. The handle is released when this value is dropped.
pub struct MupdfLayout {
    document: Document,
    path: PathBuf,
}

impl MupdfLayout {
    /// Opens a document for layout extraction.
    pub fn open(path: &Path) -> RedactorResult<Self> {
        let path_str = path.to_str().ok_or_else(|| RedactorError::InvalidInput {
            parameter: "input".to_string(),
            reason: "Path contains invalid UTF-8".to_string(),
        })?;

        let document = Document::open(path_str).map_err(|e| RedactorError::PdfProcessing {
            message: format!("Failed to open '{}' with MuPDF", path.display()),
            page: None,
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            document,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LayoutSource for MupdfLayout {
    fn page_count(&self) -> RedactorResult<usize> {
        let count = self
            .document
            .page_count()
            .map_err(|e| RedactorError::BackendError {
                backend: "MuPDF".to_string(),
                message: format!("Failed to get page count: {}", e),
                source: Some(Box::new(e)),
            })?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn page_runs(&self, page_index: usize) -> RedactorResult<Vec<TextRun>> {
        if page_index >= self.page_count()? {
            return Ok(Vec::new());
        }

        let page_number = page_index + 1;
        let page = self
            .document
            .load_page(page_index as i32)
            .map_err(|e| RedactorError::page("Failed to load page", page_number, e))?;

        // Ligatures are kept as single characters so the collector can see them.
        let text_page = page
            .to_text_page(TextPageOptions::PRESERVE_LIGATURES)
            .map_err(|e| RedactorError::page("Failed to build structured text", page_number, e))?;

        let mut collector = TextRunCollector::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let turn = line
                    .chars()
                    .next()
                    .map(|ch| {
                        let quad = ch.quad();
                        QuarterTurn::from_baseline(quad.lr.x - quad.ll.x, quad.lr.y - quad.ll.y)
                    })
                    .unwrap_or_default();
                collector.set_turn(turn);

                for ch in line.chars() {
                    let origin = ch.origin();
                    let quad = ch.quad();
                    let upright = |x: f32, y: f32| turn.point_to_upright(x, y);

                    let (origin_x, origin_y) = upright(origin.x, origin.y);
                    let ul = upright(quad.ul.x, quad.ul.y);
                    let ur = upright(quad.ur.x, quad.ur.y);
                    let lr = upright(quad.lr.x, quad.lr.y);

                    let top = ul.1.min(ur.1);
                    let end_x = ur.0.max(lr.0);
                    let ascent = origin_y - top;
                    let height = if ascent > 0.0 { ascent } else { ch.size() };

                    collector.push_glyph(
                        ch.char().unwrap_or('\u{FFFD}'),
                        GlyphPosition::new(origin_x, origin_y, end_x, height),
                    );
                }
                collector.end_run();
            }
        }

        Ok(collector.finish())
    }
}
