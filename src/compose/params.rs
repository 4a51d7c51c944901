//! Parameter types produced by the geometry layer.
//!
//! These structs describe *what* to draw, not *how*. They are the interface
//! between [`geometry`](super::geometry) (which decides sizes and rects) and
//! the compositors (which do the pixel work), and are recomputed for every
//! render.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`TextSizes`]: Font sizes and line caps for date, title and content.
//! - [`Spacing`]: Vertical gaps between the date, title and content blocks.
//! - [`LayoutSplit`]: The photo region and text region of a canvas.

use super::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Quality as the `u8` the JPEG encoder expects.
    pub fn as_u8(self) -> u8 {
        self.0.clamp(1, 100) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Font sizes (in canvas pixels) and line caps for the text blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSizes {
    pub date_size: u32,
    pub title_size: u32,
    pub title_max_lines: usize,
    pub content_size: u32,
    /// `None` while fitting: content is measured unclamped.
    pub content_max_lines: Option<usize>,
}

/// Vertical gaps (in canvas pixels) between text blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    pub after_date: u32,
    pub after_title: u32,
}

/// A canvas partitioned into a photo region and a text region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSplit {
    pub photo_rect: Rect,
    pub text_rect: Rect,
}
