//! PII detection over PDF pages.
//!
//! [`PiiDetector`] ties the pieces together: a [`LayoutSource`] produces
//! positioned text runs for a page, [`matcher::match_runs`] finds PII in
//! each run, and [`resolver::resolve`] turns every match into a
//! page-space rectangle.

pub mod matcher;
pub mod resolver;

pub use matcher::{match_runs, RunMatch};
pub use resolver::{locate, resolve, Resolution};

use crate::domain::{PageRect, RedactionCategory, RedactionMask, TextRun};
use crate::error::{RedactorError, RedactorResult};
use crate::extraction::{LayoutSource, MupdfLayout};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// A piece of PII located on a page.
///
/// The rectangle is in top-left-origin page space, in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPii {
    pub text: String,
    pub category: RedactionCategory,
    pub page_index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DetectedPii {
    pub fn rect(&self) -> PageRect {
        PageRect::new(self.x, self.y, self.width, self.height)
    }

    /// Promotes this detection to a black mask with a fresh id.
    pub fn to_mask(&self) -> RedactionMask {
        RedactionMask::new(self.page_index, self.rect(), self.category)
    }
}

/// Converts detections into masks, keeping geometry and category.
pub fn convert_to_redaction_masks(detections: &[DetectedPii]) -> Vec<RedactionMask> {
    detections.iter().map(DetectedPii::to_mask).collect()
}

/// Detects PII in the runs of a single page.
pub fn detect_in_runs(runs: &[TextRun], page_index: usize) -> Vec<DetectedPii> {
    match_runs(runs)
        .into_iter()
        .filter_map(|m| resolve(m.run, m.category, &m.span, page_index))
        .collect()
}

/// Page-oriented PII detection service.
#[derive(Debug, Clone, Default)]
pub struct PiiDetector {
    /// Restricts results to these categories; `None` keeps everything.
    categories: Option<Vec<RedactionCategory>>,
}

impl PiiDetector {
    /// Creates a detector that reports every category.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only report detections of the given categories.
    pub fn with_categories(mut self, categories: &[RedactionCategory]) -> Self {
        self.categories = Some(categories.to_vec());
        self
    }

    fn keeps(&self, category: RedactionCategory) -> bool {
        self.categories
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&category))
    }

    /// Detects PII on one page of a PDF file.
    ///
    /// An out-of-range page or a page that fails to extract yields an empty
    /// list; only a document that cannot be opened is an error.
    pub fn detect_pii(&self, file: &Path, page_index: usize) -> RedactorResult<Vec<DetectedPii>> {
        let layout = MupdfLayout::open(file)?;
        self.detect_page(&layout, page_index)
    }

    /// Detects PII on one page of any layout source. Any index past the
    /// last page, up to `usize::MAX`, yields an empty list.
    pub fn detect_page(
        &self,
        source: &dyn LayoutSource,
        page_index: usize,
    ) -> RedactorResult<Vec<DetectedPii>> {
        let page_count = source.page_count()?;
        if page_index >= page_count {
            debug!(page = page_index, page_count, "page out of range, skipping");
            return Ok(Vec::new());
        }
        self.detect_in_source(source, page_index..page_index + 1, None)
    }

    /// Detects PII on every page of a PDF file, in page order.
    pub fn detect_pii_in_all_pages(&self, file: &Path) -> RedactorResult<Vec<DetectedPii>> {
        let layout = MupdfLayout::open(file)?;
        let pages = 0..layout.page_count()?;
        let detections = self.detect_in_source(&layout, pages, None)?;
        info!(
            file = %file.display(),
            detections = detections.len(),
            "PII detection finished"
        );
        Ok(detections)
    }

    /// Like [`Self::detect_pii_in_all_pages`], checking `cancel` before each
    /// page. A cancelled scan returns [`RedactorError::Cancelled`] and drops
    /// whatever it had found.
    pub fn detect_pii_in_all_pages_cancellable(
        &self,
        file: &Path,
        cancel: &AtomicBool,
    ) -> RedactorResult<Vec<DetectedPii>> {
        let layout = MupdfLayout::open(file)?;
        let pages = 0..layout.page_count()?;
        self.detect_in_source(&layout, pages, Some(cancel))
    }

    /// Detects PII on a range of pages of any layout source.
    ///
    /// Pages past the end of the document are ignored. A page whose runs
    /// cannot be extracted is logged and skipped so the rest of the range is
    /// still scanned.
    pub fn detect_in_source(
        &self,
        source: &dyn LayoutSource,
        pages: Range<usize>,
        cancel: Option<&AtomicBool>,
    ) -> RedactorResult<Vec<DetectedPii>> {
        let page_count = source.page_count()?;
        let mut detections = Vec::new();

        for page_index in pages {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                info!(page = page_index, "PII detection cancelled");
                return Err(RedactorError::Cancelled);
            }
            if page_index >= page_count {
                debug!(page = page_index, page_count, "page out of range, skipping");
                continue;
            }

            let runs = match source.page_runs(page_index) {
                Ok(runs) => runs,
                Err(e) => {
                    warn!(page = page_index, error = %e, "text extraction failed, skipping page");
                    continue;
                }
            };

            let found: Vec<DetectedPii> = detect_in_runs(&runs, page_index)
                .into_iter()
                .filter(|d| self.keeps(d.category))
                .collect();
            debug!(
                page = page_index,
                runs = runs.len(),
                detections = found.len(),
                "page scanned"
            );
            detections.extend(found);
        }

        Ok(detections)
    }
}
