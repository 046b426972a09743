//! Mask burn-in strategies and service layer.
//!
//! This module provides a strategy pattern for writing redaction masks into
//! PDFs, with [`RedactionService`] handling input validation, logging and
//! output handling around whichever strategy is plugged in.

pub mod overlay;
pub mod strategy;

pub use overlay::OverlayStrategy;
pub use strategy::{BurnReport, RedactionStrategy};

use crate::detection::{convert_to_redaction_masks, PiiDetector};
use crate::domain::{MaskColor, RedactionMask};
use crate::error::{RedactorError, RedactorResult};
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

/// Redaction service coordinating strategy execution.
pub struct RedactionService {
    strategy: Box<dyn RedactionStrategy>,
}

impl RedactionService {
    /// Creates a new redaction service with the specified strategy.
    pub fn new(strategy: Box<dyn RedactionStrategy>) -> Self {
        Self { strategy }
    }

    /// Creates a service that burns masks as opaque overlays.
    pub fn with_overlay_strategy() -> Self {
        Self::new(Box::new(OverlayStrategy::new()))
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Burns `masks` into the PDF at `original` and writes it to `output`.
    ///
    /// Masks on pages the document does not have are skipped. On failure
    /// nothing written to `output` should be treated as a valid PDF.
    pub fn burn_masks(
        &self,
        original: &Path,
        masks: &[RedactionMask],
        output: &mut dyn Write,
    ) -> RedactorResult<BurnReport> {
        let result = std::fs::read(original)
            .map_err(|e| RedactorError::Io {
                path: original.to_path_buf(),
                source: e,
            })
            .and_then(|bytes| self.strategy.burn(&bytes, masks, output));

        match &result {
            Ok(report) => info!(
                file = %original.display(),
                strategy = self.strategy.name(),
                masks_drawn = report.masks_drawn,
                masks_skipped = report.masks_skipped,
                pages_modified = report.pages_modified,
                "masks burned"
            ),
            Err(e) => error!(file = %original.display(), error = %e, "burn-in failed"),
        }

        result
    }

    /// Burns masks and writes the result to a file.
    ///
    /// The output is assembled in memory first, so the file is only created
    /// once the whole document has been written successfully.
    pub fn burn_masks_to_file(
        &self,
        original: &Path,
        masks: &[RedactionMask],
        output: &Path,
    ) -> RedactorResult<BurnReport> {
        let mut buffer = Vec::new();
        let report = self.burn_masks(original, masks, &mut buffer)?;

        std::fs::write(output, &buffer).map_err(|e| RedactorError::Io {
            path: output.to_path_buf(),
            source: e,
        })?;

        Ok(report)
    }

    /// Detects PII on every page and burns a mask over each detection.
    ///
    /// Returns the masks that were generated along with the burn report so
    /// callers can persist them.
    pub fn redact_detected(
        &self,
        detector: &PiiDetector,
        input: &Path,
        output: &Path,
        color: MaskColor,
    ) -> RedactorResult<(Vec<RedactionMask>, BurnReport)> {
        if !input.exists() {
            return Err(RedactorError::Io {
                path: input.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Input file does not exist",
                ),
            });
        }

        let detections = detector.detect_pii_in_all_pages(input)?;
        let masks: Vec<RedactionMask> = convert_to_redaction_masks(&detections)
            .into_iter()
            .map(|mask| mask.with_color(color))
            .collect();

        let report = self.burn_masks_to_file(input, &masks, output)?;
        Ok((masks, report))
    }
}

impl Default for RedactionService {
    fn default() -> Self {
        Self::with_overlay_strategy()
    }
}
