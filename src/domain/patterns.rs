//! PII pattern registry.
//!
//! An ordered, process-wide table of regular expressions, each tagged with
//! the [`RedactionCategory`] it detects. Every pattern is tried against
//! every input; overlapping matches from different categories are all
//! reported and left for the caller to resolve.

use super::RedactionCategory;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A compiled detection rule.
#[derive(Debug)]
pub struct PiiPattern {
    pub category: RedactionCategory,
    pub matcher: Regex,
    pub description: &'static str,
}

impl PiiPattern {
    fn new(category: RedactionCategory, pattern: &str, description: &'static str) -> Self {
        Self {
            category,
            matcher: Regex::new(pattern).expect("Valid PII regex pattern"),
            description,
        }
    }

    /// Returns every non-overlapping match of this pattern in `text`.
    pub fn find_all(&self, text: &str) -> Vec<MatchSpan> {
        self.matcher
            .find_iter(text)
            .map(|m| MatchSpan::from_byte_range(text, m.start(), m.end()))
            .collect()
    }
}

/// A matched substring and its character offsets within the searched text.
///
/// `start` and `end` count Unicode scalar values, not bytes; `end` is
/// exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    /// Builds a span from the byte range a regex reported.
    pub fn from_byte_range(haystack: &str, byte_start: usize, byte_end: usize) -> Self {
        let text = &haystack[byte_start..byte_end];
        let start = haystack[..byte_start].chars().count();
        let len = text.chars().count();
        Self {
            text: text.to_string(),
            start,
            end: start + len,
        }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of the last covered character, if any.
    pub fn last(&self) -> Option<usize> {
        self.end.checked_sub(1).filter(|&last| last >= self.start)
    }
}

const REGION_NAMES: &str = "서울특별시|서울시|서울|부산광역시|부산|대구광역시|대구|인천광역시|인천|\
광주광역시|광주|대전광역시|대전|울산광역시|울산|세종특별자치시|세종|경기도|경기|강원특별자치도|강원도|강원|\
충청북도|충북|충청남도|충남|전북특별자치도|전라북도|전북|전라남도|전남|경상북도|경북|경상남도|경남|\
제주특별자치도|제주도|제주";

const ADDRESS_UNITS: &str = "번지|로|길|동|읍|면|리|가";

static PATTERNS: Lazy<Vec<PiiPattern>> = Lazy::new(|| {
    vec![
        PiiPattern::new(
            RedactionCategory::Rrn,
            r"\d{6}-?\d{7}",
            "Resident registration number (YYMMDD-NNNNNNN)",
        ),
        PiiPattern::new(
            RedactionCategory::PhoneNumber,
            r"010[-.\s]?\d{4}[-.\s]?\d{4}",
            "Mobile phone number (010-NNNN-NNNN)",
        ),
        PiiPattern::new(
            RedactionCategory::Email,
            r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
            "Email address",
        ),
        PiiPattern::new(
            RedactionCategory::BirthDate,
            r"(?:19|20)\d{2}[-./]?(?:0[1-9]|1[0-2])[-./]?(?:0[1-9]|[12]\d|3[01])",
            "Birth date (YYYY-MM-DD, YYYY.MM.DD, YYYY/MM/DD, YYYYMMDD)",
        ),
        PiiPattern::new(
            RedactionCategory::Address,
            &format!(r"(?:{REGION_NAMES})[^\n]{{0,50}}(?:{ADDRESS_UNITS})[\d\- ]*"),
            "Korean street or lot address",
        ),
    ]
});

/// Returns the registry in application order.
pub fn patterns() -> &'static [PiiPattern] {
    &PATTERNS
}

/// Returns the registry entry for a category, if it has one.
pub fn pattern_for(category: RedactionCategory) -> Option<&'static PiiPattern> {
    patterns().iter().find(|p| p.category == category)
}

/// Applies every registered pattern to `text`, in registry order.
pub fn detect_all(text: &str) -> Vec<(RedactionCategory, MatchSpan)> {
    patterns()
        .iter()
        .flat_map(|pattern| {
            pattern
                .find_all(text)
                .into_iter()
                .map(move |span| (pattern.category, span))
        })
        .collect()
}
