//! Domain models for PII detection and redaction masks.
//!
//! This module holds the data the rest of the crate passes around: the
//! pattern registry, page-space geometry, and redaction masks.

pub mod geometry;
pub mod mask;
pub mod patterns;

pub use geometry::{GlyphPosition, PageBox, PageRect, QuarterTurn, TextRun};
pub use mask::{MaskColor, MaskSet, RedactionMask};
pub use patterns::{detect_all, MatchSpan, PiiPattern};

use crate::error::RedactorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What produced a redaction: a user drawing, or one of the PII patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedactionCategory {
    Manual,
    PhoneNumber,
    Email,
    Rrn,
    BirthDate,
    Address,
}

impl RedactionCategory {
    /// Categories produced by automatic detection.
    pub const DETECTABLE: [RedactionCategory; 5] = [
        RedactionCategory::PhoneNumber,
        RedactionCategory::Email,
        RedactionCategory::Rrn,
        RedactionCategory::BirthDate,
        RedactionCategory::Address,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::Email => "EMAIL",
            Self::Rrn => "RRN",
            Self::BirthDate => "BIRTH_DATE",
            Self::Address => "ADDRESS",
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

impl fmt::Display for RedactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedactionCategory {
    type Err = RedactorError;

    /// Accepts the serialized names case-insensitively, with `-` or `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "MANUAL" => Ok(Self::Manual),
            "PHONE_NUMBER" | "PHONE" => Ok(Self::PhoneNumber),
            "EMAIL" => Ok(Self::Email),
            "RRN" => Ok(Self::Rrn),
            "BIRTH_DATE" => Ok(Self::BirthDate),
            "ADDRESS" => Ok(Self::Address),
            _ => Err(RedactorError::InvalidInput {
                parameter: "category".to_string(),
                reason: format!("unknown redaction category '{}'", s),
            }),
        }
    }
}
