//! Redaction masks and the per-session mask set.
//!
//! A mask is an opaque rectangle tagged with the category that produced it
//! and the colour it is burned with. Masks live in top-left-origin page
//! space, the same space detections are reported in.

use super::geometry::PageRect;
use super::RedactionCategory;
use crate::error::RedactorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Packed ARGB colour (`0xAARRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskColor(pub u32);

impl MaskColor {
    pub const BLACK: MaskColor = MaskColor(0xFF00_0000);
    pub const WHITE: MaskColor = MaskColor(0xFFFF_FFFF);

    /// Swatches offered next to the pixel picker.
    pub const PRESET_SWATCHES: [MaskColor; 6] = [
        MaskColor::BLACK,
        MaskColor::WHITE,
        MaskColor(0xFF80_8080),
        MaskColor(0xFFD3_2F2F),
        MaskColor(0xFF19_76D2),
        MaskColor(0xFFFB_C02D),
    ];

    pub fn from_argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self(u32::from_be_bytes([alpha, red, green, blue]))
    }

    /// Opaque colour sampled from a rendered page pixel.
    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_argb(0xFF, red, green, blue)
    }

    pub fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(&self) -> u8 {
        self.0 as u8
    }

    /// Normalized RGB components for a PDF `rg` operator. Alpha is ignored:
    /// burned masks are always opaque.
    pub fn rgb_f32(&self) -> [f32; 3] {
        [
            f32::from(self.red()) / 255.0,
            f32::from(self.green()) / 255.0,
            f32::from(self.blue()) / 255.0,
        ]
    }
}

impl Default for MaskColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for MaskColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for MaskColor {
    type Err = RedactorError;

    /// Parses `#RRGGBB` (opaque) or `#AARRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RedactorError::InvalidInput {
            parameter: "color".to_string(),
            reason: format!("'{}': {}", s, reason),
        };

        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("expected hexadecimal digits"));
        }
        let value = u32::from_str_radix(hex, 16).map_err(|e| invalid(&e.to_string()))?;

        match hex.len() {
            6 => Ok(Self(0xFF00_0000 | value)),
            8 => Ok(Self(value)),
            _ => Err(invalid("expected #RRGGBB or #AARRGGBB")),
        }
    }
}

/// A confirmed rectangle to be burned into a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionMask {
    pub id: String,
    pub page_index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub category: RedactionCategory,
    #[serde(default)]
    pub color: MaskColor,
}

impl RedactionMask {
    /// Creates a black mask with a fresh id. Negative extents are clamped
    /// to zero.
    pub fn new(page_index: usize, rect: PageRect, category: RedactionCategory) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            page_index,
            x: rect.x,
            y: rect.y,
            width: rect.width.max(0.0),
            height: rect.height.max(0.0),
            category,
            color: MaskColor::BLACK,
        }
    }

    /// A user-drawn mask.
    pub fn manual(page_index: usize, rect: PageRect) -> Self {
        Self::new(page_index, rect, RedactionCategory::Manual)
    }

    pub fn with_color(mut self, color: MaskColor) -> Self {
        self.color = color;
        self
    }

    pub fn rect(&self) -> PageRect {
        PageRect::new(self.x, self.y, self.width, self.height)
    }
}

/// The masks of one editing session.
///
/// Duplicate geometry is allowed; overlapping opaque fills are harmless.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskSet {
    masks: Vec<RedactionMask>,
}

impl MaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mask: RedactionMask) {
        self.masks.push(mask);
    }

    /// Removes the mask with the given id and returns it.
    pub fn remove(&mut self, id: &str) -> Option<RedactionMask> {
        let index = self.masks.iter().position(|m| m.id == id)?;
        Some(self.masks.remove(index))
    }

    /// Replaces the whole set.
    pub fn replace_all(&mut self, masks: Vec<RedactionMask>) {
        self.masks = masks;
    }

    pub fn masks(&self) -> &[RedactionMask] {
        &self.masks
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Groups the masks by page, preserving insertion order within a page.
    pub fn group_by_page(&self) -> BTreeMap<usize, Vec<&RedactionMask>> {
        group_by_page(&self.masks)
    }
}

impl From<Vec<RedactionMask>> for MaskSet {
    fn from(masks: Vec<RedactionMask>) -> Self {
        Self { masks }
    }
}

/// Groups masks by page, preserving their relative order.
pub fn group_by_page(masks: &[RedactionMask]) -> BTreeMap<usize, Vec<&RedactionMask>> {
    let mut pages: BTreeMap<usize, Vec<&RedactionMask>> = BTreeMap::new();
    for mask in masks {
        pages.entry(mask.page_index).or_default().push(mask);
    }
    pages
}
