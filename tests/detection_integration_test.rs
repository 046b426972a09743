//! End-to-end detection tests against real PDFs.
//!
//! Documents are generated with lopdf, read back through MuPDF, and the
//! resulting boxes are checked against the known text layout.

mod common;

use anyhow::Result;
use common::*;
use pii_redactor::{
    LayoutSource, MupdfLayout, PiiDetector, RedactionCategory, RedactionService, RedactorError,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;

fn contact_sheet(temp: &TempDir) -> Result<PathBuf> {
    create_contact_sheet(&temp.path().join("contacts.pdf"))
}

#[test]
fn test_layout_runs_follow_lines() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = contact_sheet(&temp)?;

    let layout = MupdfLayout::open(&input)?;
    assert_eq!(layout.page_count()?, 1);

    let runs = layout.page_runs(0)?;
    assert_eq!(runs.len(), 5);
    assert!(runs[1].text.contains("010-1234-5678"));

    for (index, run) in runs.iter().enumerate() {
        assert!(run.has_exact_glyphs(), "run {} has no exact glyphs", index);
        assert_close(run.origin_x, LEFT_MARGIN, "run x");
        assert_close(run.origin_y, TestPdfBuilder::baseline(index), "run baseline");
        assert!(run.height > 0.0);
    }
    Ok(())
}

#[test]
fn test_out_of_range_page_has_no_runs() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = contact_sheet(&temp)?;

    let layout = MupdfLayout::open(&input)?;
    assert!(layout.page_runs(3)?.is_empty());
    Ok(())
}

#[test]
fn test_phone_number_box() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = contact_sheet(&temp)?;

    let detections = PiiDetector::new().detect_pii(&input, 0)?;
    let phone = assert_single_detection(&detections, RedactionCategory::PhoneNumber, "010-1234-5678");

    assert_eq!(phone.page_index, 0);
    assert_box_on_page(phone, PAGE_WIDTH, PAGE_HEIGHT);
    // the box sits on the baseline of the second line
    assert_close(phone.y + phone.height, TestPdfBuilder::baseline(1), "phone bottom");
    // it starts after "Contact: " and is narrower than the whole line
    assert!(phone.x > LEFT_MARGIN + 20.0 && phone.x < LEFT_MARGIN + 80.0);
    assert!(phone.width > 40.0 && phone.width < 120.0);
    Ok(())
}

#[test]
fn test_all_categories_on_contact_sheet() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = contact_sheet(&temp)?;

    let detections = PiiDetector::new().detect_pii_in_all_pages(&input)?;
    assert_eq!(detections.len(), 3, "unexpected detections: {:?}", detections);

    let email = assert_single_detection(&detections, RedactionCategory::Email, "hong@example.com");
    let date = assert_single_detection(&detections, RedactionCategory::BirthDate, "2023.05.14");
    assert_close(email.y + email.height, TestPdfBuilder::baseline(2), "email bottom");
    assert_close(date.y + date.height, TestPdfBuilder::baseline(3), "date bottom");

    for detection in &detections {
        assert_box_on_page(detection, PAGE_WIDTH, PAGE_HEIGHT);
    }
    Ok(())
}

#[test]
fn test_category_filter_on_document() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = contact_sheet(&temp)?;

    let detections = PiiDetector::new()
        .with_categories(&[RedactionCategory::Email])
        .detect_pii_in_all_pages(&input)?;
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].category, RedactionCategory::Email);
    Ok(())
}

#[test]
fn test_multi_page_detections_are_in_page_order() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = create_multi_page(&temp.path().join("multi.pdf"), 3)?;

    let detections = PiiDetector::new().detect_pii_in_all_pages(&input)?;
    let pages: Vec<usize> = detections.iter().map(|d| d.page_index).collect();
    assert_eq!(pages, vec![0, 1, 2]);
    assert_eq!(detections[2].text, "010-0000-0002");

    let second = PiiDetector::new().detect_pii(&input, 1)?;
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].text, "010-0000-0001");
    Ok(())
}

#[test]
fn test_out_of_range_page_is_empty() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = contact_sheet(&temp)?;

    assert!(PiiDetector::new().detect_pii(&input, 9)?.is_empty());
    assert!(PiiDetector::new().detect_pii(&input, usize::MAX)?.is_empty());
    Ok(())
}

#[test]
fn test_missing_document_is_an_error() {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let result = PiiDetector::new().detect_pii_in_all_pages(std::path::Path::new(
        "/nonexistent/missing.pdf",
    ));
    assert!(result.is_err());
}

#[test]
fn test_detection_is_repeatable() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = contact_sheet(&temp)?;

    let detector = PiiDetector::new();
    let first = detector.detect_pii_in_all_pages(&input)?;
    let second = detector.detect_pii_in_all_pages(&input)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_cancellation() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = create_multi_page(&temp.path().join("multi.pdf"), 2)?;
    let detector = PiiDetector::new();

    let running = AtomicBool::new(false);
    let found = detector.detect_pii_in_all_pages_cancellable(&input, &running)?;
    assert_eq!(found.len(), 2);

    let cancelled = AtomicBool::new(true);
    let result = detector.detect_pii_in_all_pages_cancellable(&input, &cancelled);
    assert!(matches!(result, Err(RedactorError::Cancelled)));
    Ok(())
}

#[test]
fn test_burned_boxes_match_detections() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = contact_sheet(&temp)?;
    let output = temp.path().join("redacted.pdf");

    let service = RedactionService::with_overlay_strategy();
    let (masks, report) = service.redact_detected(
        &PiiDetector::new(),
        &input,
        &output,
        pii_redactor::MaskColor::BLACK,
    )?;
    assert_eq!(masks.len(), 3);
    assert_eq!(report.masks_drawn, 3);

    let bytes = std::fs::read(&output)?;
    let rects = filled_rects(&bytes, 0)?;
    assert_eq!(rects.len(), masks.len());

    for (mask, [x, y, w, h]) in masks.iter().zip(rects) {
        assert_close(x, mask.x, "x");
        assert_close(y, PAGE_HEIGHT - mask.y - mask.height, "y");
        assert_close(w, mask.width, "width");
        assert_close(h, mask.height, "height");
    }
    Ok(())
}

/// Burns the detections of `input` and returns the painted user-space rects.
fn detect_and_burn(input: &std::path::Path, output: &std::path::Path) -> Result<Vec<[f32; 4]>> {
    let service = RedactionService::with_overlay_strategy();
    let (masks, report) = service.redact_detected(
        &PiiDetector::new(),
        input,
        output,
        pii_redactor::MaskColor::BLACK,
    )?;
    assert_eq!(masks.len(), 3, "unexpected masks: {:?}", masks);
    assert_eq!(report.masks_drawn, 3);
    Ok(filled_rects(&std::fs::read(output)?, 0)?)
}

#[test]
fn test_rotated_page_detections_are_turned() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let input = create_rotated_contact_sheet(&temp.path().join("rotated.pdf"), 90)?;

    let detections = PiiDetector::new().detect_pii(&input, 0)?;
    let phone = assert_single_detection(&detections, RedactionCategory::PhoneNumber, "010-1234-5678");

    // the line reads top to bottom on a landscape display
    assert_box_on_page(phone, PAGE_HEIGHT, PAGE_WIDTH);
    assert!(phone.height > phone.width);
    assert!(phone.height > 40.0 && phone.height < 120.0);
    Ok(())
}

#[test]
fn test_rotated_pages_burn_over_the_same_text() -> Result<()> {
    let _guard = MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new()?;
    let upright = detect_and_burn(
        &contact_sheet(&temp)?,
        &temp.path().join("upright-redacted.pdf"),
    )?;

    for degrees in [90, 180, 270] {
        let input =
            create_rotated_contact_sheet(&temp.path().join(format!("rotated-{}.pdf", degrees)), degrees)?;
        let output = temp.path().join(format!("rotated-{}-redacted.pdf", degrees));
        let rotated = detect_and_burn(&input, &output)?;

        assert_eq!(rotated.len(), upright.len());
        for expected in &upright {
            // detection order follows the display, so match by position
            let found = rotated.iter().any(|rect| {
                rect.iter()
                    .zip(expected)
                    .all(|(a, b)| (a - b).abs() <= EPSILON)
            });
            assert!(found, "{:?} not burned on the {} degree page: {:?}", expected, degrees, rotated);
        }
    }
    Ok(())
}

