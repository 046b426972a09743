//! Page-space geometry for text runs and redaction rectangles.
//!
//! All coordinates are PDF points. Text runs and detections live in
//! top-left-origin page space (y grows downwards, as MuPDF reports it);
//! PDF content streams use bottom-left-origin user space, and
//! [`PageRect::to_bottom_left`] converts between the two.
//!
//! Page space is the page as displayed, after its `/Rotate` turn has been
//! applied. Text drawn sideways on such a page is measured in the run's
//! own upright frame and turned back into page space with [`QuarterTurn`].

use serde::{Deserialize, Serialize};

/// A clockwise rotation by a multiple of 90 degrees.
///
/// Points are in top-left-origin coordinates (y grows downwards), so a
/// clockwise turn maps `(x, y)` to `(-y, x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarterTurn {
    #[default]
    Upright,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl QuarterTurn {
    /// Normalizes a `/Rotate` angle, snapping to the nearest quarter turn.
    pub fn from_degrees(degrees: i64) -> Self {
        match degrees.rem_euclid(360) {
            45..=134 => Self::Clockwise90,
            135..=224 => Self::Clockwise180,
            225..=314 => Self::Clockwise270,
            _ => Self::Upright,
        }
    }

    /// The turn that carries an upright baseline onto the direction `(dx, dy)`.
    pub fn from_baseline(dx: f32, dy: f32) -> Self {
        if dx.abs() >= dy.abs() {
            if dx >= 0.0 {
                Self::Upright
            } else {
                Self::Clockwise180
            }
        } else if dy > 0.0 {
            Self::Clockwise90
        } else {
            Self::Clockwise270
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Self::Upright => 0,
            Self::Clockwise90 => 90,
            Self::Clockwise180 => 180,
            Self::Clockwise270 => 270,
        }
    }

    /// Undoes this turn for a single point.
    pub fn point_to_upright(self, x: f32, y: f32) -> (f32, f32) {
        match self {
            Self::Upright => (x, y),
            Self::Clockwise90 => (y, -x),
            Self::Clockwise180 => (-x, -y),
            Self::Clockwise270 => (-y, x),
        }
    }

    /// Applies this turn to a rectangle measured in the upright frame.
    pub fn rect_from_upright(self, rect: &PageRect) -> PageRect {
        let PageRect {
            x,
            y,
            width,
            height,
        } = *rect;
        match self {
            Self::Upright => *rect,
            Self::Clockwise90 => PageRect::new(-(y + height), x, height, width),
            Self::Clockwise180 => PageRect::new(-(x + width), -(y + height), width, height),
            Self::Clockwise270 => PageRect::new(y, -(x + width), height, width),
        }
    }

    /// Inverse of [`QuarterTurn::rect_from_upright`].
    pub fn rect_to_upright(self, rect: &PageRect) -> PageRect {
        let PageRect {
            x,
            y,
            width,
            height,
        } = *rect;
        match self {
            Self::Upright => *rect,
            Self::Clockwise90 => PageRect::new(y, -(x + width), height, width),
            Self::Clockwise180 => PageRect::new(-(x + width), -(y + height), width, height),
            Self::Clockwise270 => PageRect::new(-(y + height), x, height, width),
        }
    }
}

/// Placement of a single character within a [`TextRun`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphPosition {
    /// Left edge of the glyph (its pen origin).
    pub origin_x: f32,
    /// Baseline y of the glyph.
    pub origin_y: f32,
    /// Right edge of the glyph.
    pub end_x: f32,
    /// Height above the baseline.
    pub height: f32,
}

impl GlyphPosition {
    pub fn new(origin_x: f32, origin_y: f32, end_x: f32, height: f32) -> Self {
        Self {
            origin_x,
            origin_y,
            end_x,
            height,
        }
    }
}

/// A contiguous fragment of text as emitted by the extraction pass.
///
/// `origin_y` is a baseline, not the top edge. Coordinates are in the
/// run's upright frame; `turn` carries them back into page space and is
/// [`QuarterTurn::Upright`] for ordinary horizontal text. When `glyph_positions` is
/// non-empty it is expected to hold one entry per character of `text`;
/// consumers must not rely on that and check [`TextRun::has_exact_glyphs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub origin_x: f32,
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub glyph_positions: Vec<GlyphPosition>,
    #[serde(default)]
    pub turn: QuarterTurn,
}

impl TextRun {
    /// Creates a run with an explicit aggregate box.
    pub fn new(
        text: impl Into<String>,
        origin_x: f32,
        origin_y: f32,
        width: f32,
        height: f32,
        glyph_positions: Vec<GlyphPosition>,
    ) -> Self {
        Self {
            text: text.into(),
            origin_x,
            origin_y,
            width,
            height,
            glyph_positions,
            turn: QuarterTurn::Upright,
        }
    }

    /// Creates a run whose box is derived from its edge glyphs.
    ///
    /// x and y come from the first glyph, width spans from the first glyph's
    /// origin to the last glyph's end, and height is the first glyph's
    /// height. This is an approximation of the run's extent, not a union of
    /// every glyph box. Returns `None` when there are no glyphs.
    pub fn from_glyphs(text: impl Into<String>, glyph_positions: Vec<GlyphPosition>) -> Option<Self> {
        let first = *glyph_positions.first()?;
        let last = *glyph_positions.last()?;

        Some(Self {
            text: text.into(),
            origin_x: first.origin_x,
            origin_y: first.origin_y,
            width: last.end_x - first.origin_x,
            height: first.height,
            glyph_positions,
            turn: QuarterTurn::Upright,
        })
    }

    /// Marks the run as drawn with the given turn in page space.
    pub fn with_turn(mut self, turn: QuarterTurn) -> Self {
        self.turn = turn;
        self
    }

    /// Number of characters in the run text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// True when there is exactly one glyph position per character.
    pub fn has_exact_glyphs(&self) -> bool {
        !self.glyph_positions.is_empty() && self.glyph_positions.len() == self.char_len()
    }
}

/// Axis-aligned rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Flips a top-left-origin rectangle into bottom-left-origin space.
    ///
    /// The flip is its own inverse, so the same call converts back.
    pub fn to_bottom_left(&self, page_height: f32) -> Self {
        Self {
            x: self.x,
            y: page_height - self.y - self.height,
            width: self.width,
            height: self.height,
        }
    }
}

/// Visible page area in PDF user space (lower-left / upper-right corners),
/// plus the page's display rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub rotation: QuarterTurn,
}

impl PageBox {
    /// US Letter, used when a page declares neither CropBox nor MediaBox.
    pub const LETTER: PageBox = PageBox {
        x0: 0.0,
        y0: 0.0,
        x1: 612.0,
        y1: 792.0,
        rotation: QuarterTurn::Upright,
    };

    /// Builds a box from two arbitrary corners.
    pub fn from_corners(ax: f32, ay: f32, bx: f32, by: f32) -> Self {
        Self {
            x0: ax.min(bx),
            y0: ay.min(by),
            x1: ax.max(bx),
            y1: ay.max(by),
            rotation: QuarterTurn::Upright,
        }
    }

    pub fn with_rotation(mut self, rotation: QuarterTurn) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Width and height of the page as displayed.
    pub fn display_size(&self) -> (f32, f32) {
        match self.rotation {
            QuarterTurn::Upright | QuarterTurn::Clockwise180 => (self.width(), self.height()),
            QuarterTurn::Clockwise90 | QuarterTurn::Clockwise270 => (self.height(), self.width()),
        }
    }

    /// Maps a top-left page-space rectangle into PDF user space.
    ///
    /// The page's rotation is undone first, then the rectangle is flipped
    /// against the box. For an unrotated box anchored at (0, 0) this is
    /// `(x, height - y - h, w, h)`.
    pub fn to_user_space(&self, rect: &PageRect) -> PageRect {
        // displayed origin of the upright page after the turn
        let (dx, dy) = match self.rotation {
            QuarterTurn::Upright => (0.0, 0.0),
            QuarterTurn::Clockwise90 => (self.height(), 0.0),
            QuarterTurn::Clockwise180 => (self.width(), self.height()),
            QuarterTurn::Clockwise270 => (0.0, self.width()),
        };
        let shifted = PageRect::new(rect.x - dx, rect.y - dy, rect.width, rect.height);
        let flipped = self
            .rotation
            .rect_to_upright(&shifted)
            .to_bottom_left(self.height());
        PageRect {
            x: self.x0 + flipped.x,
            y: self.y0 + flipped.y,
            width: flipped.width,
            height: flipped.height,
        }
    }
}
