//! Custom assertions for detection and burn-in tests.

use pii_redactor::{DetectedPii, RedactionCategory};

/// Tolerance for coordinates that pass through font metrics.
pub const EPSILON: f32 = 0.5;

pub fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() <= EPSILON,
        "{} should be {} (±{}) but was {}",
        what,
        expected,
        EPSILON,
        actual
    );
}

/// Asserts exactly one detection carries `text`, and returns it.
///
/// # Panics
/// Panics if no detection, or more than one, matches.
pub fn assert_single_detection<'a>(
    detections: &'a [DetectedPii],
    category: RedactionCategory,
    text: &str,
) -> &'a DetectedPii {
    let matching: Vec<&DetectedPii> = detections
        .iter()
        .filter(|d| d.category == category && d.text == text)
        .collect();
    assert_eq!(
        matching.len(),
        1,
        "expected one {} detection of '{}', found {:?}",
        category,
        text,
        detections
    );
    matching[0]
}

/// Asserts a detection has a non-degenerate box inside the page.
pub fn assert_box_on_page(detection: &DetectedPii, page_width: f32, page_height: f32) {
    assert!(detection.width > 0.0, "width must be positive: {:?}", detection);
    assert!(detection.height > 0.0, "height must be positive: {:?}", detection);
    assert!(detection.x >= 0.0 && detection.x + detection.width <= page_width + EPSILON);
    assert!(detection.y >= 0.0 && detection.y + detection.height <= page_height + EPSILON);
}
