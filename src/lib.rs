//! PII detection and redaction-mask burn-in for PDF documents.
//!
//! This library finds personally identifiable information in the text of
//! PDF pages, locates each match as a rectangle in page space, and burns
//! confirmed rectangles into a new PDF as opaque fills.
//!
//! # Features
//!
//! - **Pattern Registry**: phone numbers, emails, resident registration
//!   numbers, birth dates and Korean addresses
//! - **Glyph-accurate boxes**: per-character positions from MuPDF, with a
//!   proportional fallback when glyphs and characters disagree
//! - **Burn-in**: opaque filled rectangles written with lopdf
//! - **Mask storage**: JSON persistence keyed by project id
//!
//! # Architecture
//!
//! - [`domain`]: Patterns, geometry and redaction masks
//! - [`extraction`]: Positioned text runs from PDF pages
//! - [`detection`]: Matching and coordinate resolution
//! - [`redaction`]: Burn-in strategies and service layer
//! - [`store`]: Mask persistence
//! - [`error`]: Error handling
//!
//! # Quick Start
//!
//! ```no_run
//! use pii_redactor::{convert_to_redaction_masks, PiiDetector, RedactionService};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detections = PiiDetector::new().detect_pii_in_all_pages(Path::new("input.pdf"))?;
//! let masks = convert_to_redaction_masks(&detections);
//!
//! RedactionService::with_overlay_strategy().burn_masks_to_file(
//!     Path::new("input.pdf"),
//!     &masks,
//!     Path::new("output.pdf"),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Pattern Matching
//!
//! ```
//! use pii_redactor::domain::{detect_all, RedactionCategory};
//!
//! let found = detect_all("Contact: 010-1234-5678 thanks");
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].0, RedactionCategory::PhoneNumber);
//! assert_eq!(found[0].1.text, "010-1234-5678");
//! ```

pub mod detection;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod redaction;
pub mod store;

pub use detection::{convert_to_redaction_masks, DetectedPii, PiiDetector};
pub use domain::{
    GlyphPosition, MaskColor, MaskSet, MatchSpan, PageRect, QuarterTurn, RedactionCategory,
    RedactionMask, TextRun,
};
pub use error::{RedactorError, RedactorResult};
pub use extraction::{extract_text, LayoutSource, MupdfLayout, PreparedLayout};
pub use redaction::{BurnReport, OverlayStrategy, RedactionService, RedactionStrategy};
pub use store::{JsonMaskStore, MaskRepository, ProjectRecord};
