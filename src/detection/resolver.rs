//! Maps matched text back to page-space rectangles.
//!
//! Two paths:
//!
//! - **Exact**: the run has one glyph position per character, so the box
//!   spans from the first matched glyph's origin to the last matched glyph's
//!   end.
//! - **Estimated**: glyphs and characters disagree (ligatures, shaping,
//!   missing positions), so the match is placed proportionally within the
//!   run's aggregate box.
//!
//! Both paths convert the baseline y into a top edge by subtracting the
//! height, producing top-left-origin rectangles. Runs drawn sideways are
//! measured in their upright frame and turned back into page space last.

use super::DetectedPii;
use crate::domain::{MatchSpan, PageRect, RedactionCategory, TextRun};

/// Which branch produced a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Exact,
    Estimated,
}

/// Computes the page-space rectangle of `span` within `run`.
///
/// Returns `None` for an empty run or an empty span.
pub fn locate(run: &TextRun, span: &MatchSpan) -> Option<(PageRect, Resolution)> {
    let char_len = run.char_len();
    if char_len == 0 {
        return None;
    }
    let last = span.last()?;

    let glyphs = &run.glyph_positions;
    if glyphs.len() == char_len && span.start < glyphs.len() && last < glyphs.len() {
        let first = glyphs[span.start];
        let end = glyphs[last];
        let height = first.height;
        let rect = PageRect::new(
            first.origin_x,
            first.origin_y - height,
            end.end_x - first.origin_x,
            height,
        );
        return Some((run.turn.rect_from_upright(&rect), Resolution::Exact));
    }

    let ratio = span.start as f32 / char_len as f32;
    let rect = PageRect::new(
        run.origin_x + run.width * ratio,
        run.origin_y - run.height,
        run.width * (span.len() as f32 / char_len as f32),
        run.height,
    );
    Some((run.turn.rect_from_upright(&rect), Resolution::Estimated))
}

/// Resolves a match into a detection on `page_index`.
pub fn resolve(
    run: &TextRun,
    category: RedactionCategory,
    span: &MatchSpan,
    page_index: usize,
) -> Option<DetectedPii> {
    let (rect, _) = locate(run, span)?;
    Some(DetectedPii {
        text: span.text.clone(),
        category,
        page_index,
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
    })
}
