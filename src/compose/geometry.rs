//! Pure geometry for share images.
//!
//! All functions here are pure and testable without any I/O or pixels. Sizes
//! are expressed in logical units against a 1080×1920 baseline canvas and
//! scaled to the target [`ShareFormat`] by [`scale_factor`].

use super::format::ShareFormat;
use super::params::{LayoutSplit, Spacing, TextSizes};
use crate::types::DiaryEntry;

pub const BASELINE_WIDTH: f32 = 1080.0;
pub const BASELINE_HEIGHT: f32 = 1920.0;
const MIN_SCALE: f32 = 0.8;
const MAX_SCALE: f32 = 2.0;

const SQUARE_PHOTO_RATIO: f32 = 0.56;
const PORTRAIT_PHOTO_RATIO: f32 = 0.62;
const MIN_TEXT_WIDTH: u32 = 360;
const MIN_TEXT_HEIGHT: u32 = 520;
const LAYOUT_GAP: u32 = 24;

const TITLE_BASE: f32 = 60.0;
const TITLE_LONG_BASE: f32 = 48.0;
const TITLE_LONG_THRESHOLD: usize = 20;
const TITLE_MAX_LINES: usize = 3;
const TITLE_EXTENDED_MAX_LINES: usize = 4;
const TITLE_EXTENDED_THRESHOLD: usize = 30;

const CONTENT_BASE: f32 = 38.0;
const CONTENT_LONG_BASE: f32 = 32.0;
const CONTENT_LONG_THRESHOLD: usize = 200;

const DATE_BASE: f32 = 28.0;
const SPACING_AFTER_DATE: f32 = 20.0;
const SPACING_AFTER_TITLE: f32 = 32.0;
const BRAND_BASE: f32 = 24.0;
pub const BRAND_MARGIN: f32 = 28.0;
const TEXT_PADDING: f32 = 40.0;

/// Axis-aligned rectangle in canvas pixel space.
///
/// `right()` and `bottom()` are exclusive edges, so two rects that merely
/// touch have zero-area intersection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = self.right().min(other.right()) - self.left.max(other.left);
        let h = self.bottom().min(other.bottom()) - self.top.max(other.top);
        if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
    }

    /// Whether `other` lies entirely inside `self` (within `eps` pixels).
    pub fn contains_rect(&self, other: &Rect, eps: f32) -> bool {
        other.left >= self.left - eps
            && other.top >= self.top - eps
            && other.right() <= self.right() + eps
            && other.bottom() <= self.bottom() + eps
    }

    /// Shrink by `amount` on every side, never below zero size.
    pub fn inset(&self, amount: f32) -> Rect {
        Rect {
            left: self.left + amount,
            top: self.top + amount,
            width: (self.width - 2.0 * amount).max(0.0),
            height: (self.height - 2.0 * amount).max(0.0),
        }
    }

    /// Snap to whole pixels: `(x, y, width, height)`.
    ///
    /// Edges are rounded independently so adjacent rects stay adjacent.
    pub fn to_pixels(&self) -> (u32, u32, u32, u32) {
        let x = self.left.round().max(0.0) as u32;
        let y = self.top.round().max(0.0) as u32;
        let right = self.right().round().max(0.0) as u32;
        let bottom = self.bottom().round().max(0.0) as u32;
        (x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }
}

/// Scale of a format relative to the baseline canvas.
///
/// Square formats scale by width only; the others by the mean of the width
/// and height ratios. Clamped to `[0.8, 2.0]`.
pub fn scale_factor(format: ShareFormat) -> f32 {
    let w_ratio = format.width() as f32 / BASELINE_WIDTH;
    let h_ratio = format.height() as f32 / BASELINE_HEIGHT;
    let scale = if format.is_square() {
        w_ratio
    } else {
        (w_ratio + h_ratio) / 2.0
    };
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

fn scaled(format: ShareFormat, base: f32) -> u32 {
    ((base * scale_factor(format)).round() as u32).max(1)
}

/// Gap separating the photo region from the text region.
pub fn layout_gap(format: ShareFormat) -> u32 {
    LAYOUT_GAP * format.hd_scale()
}

/// Partition the canvas into a photo region and a text region.
///
/// Square formats split left/right, portrait formats top/bottom. The photo
/// takes its preferred share of the axis unless that would leave the text
/// less than its minimum extent.
pub fn split_layout(format: ShareFormat) -> LayoutSplit {
    let w = format.width();
    let h = format.height();
    let gap = layout_gap(format);
    let hd = format.hd_scale();

    if format.is_square() {
        let preferred = (w as f32 * SQUARE_PHOTO_RATIO).round() as u32;
        let photo_w = preferred.min(w.saturating_sub(gap + MIN_TEXT_WIDTH * hd));
        LayoutSplit {
            photo_rect: Rect::new(0.0, 0.0, photo_w as f32, h as f32),
            text_rect: Rect::new(
                (photo_w + gap) as f32,
                0.0,
                (w - photo_w - gap) as f32,
                h as f32,
            ),
        }
    } else {
        let preferred = (h as f32 * PORTRAIT_PHOTO_RATIO).round() as u32;
        let photo_h = preferred.min(h.saturating_sub(gap + MIN_TEXT_HEIGHT * hd));
        LayoutSplit {
            photo_rect: Rect::new(0.0, 0.0, w as f32, photo_h as f32),
            text_rect: Rect::new(
                0.0,
                (photo_h + gap) as f32,
                w as f32,
                (h - photo_h - gap) as f32,
            ),
        }
    }
}

/// Centered source rect of a `image_w`×`image_h` image with the aspect
/// ratio of `target_w`×`target_h`, for crop-to-fill.
///
/// # Panics
/// If any dimension is zero. Valid [`ShareFormat`] layouts never produce
/// one, so this is a caller bug rather than a runtime condition.
pub fn crop_rect(image_w: u32, image_h: u32, target_w: u32, target_h: u32) -> Rect {
    assert!(
        image_w > 0 && image_h > 0 && target_w > 0 && target_h > 0,
        "crop_rect requires positive dimensions (image {image_w}x{image_h}, target {target_w}x{target_h})"
    );

    let (iw, ih) = (image_w as f64, image_h as f64);
    let image_aspect = iw / ih;
    let target_aspect = target_w as f64 / target_h as f64;

    let (left, top, width, height) = if image_aspect > target_aspect {
        // Wider than the target: keep full height, trim the sides
        let width = ih * target_aspect;
        ((iw - width) / 2.0, 0.0, width, ih)
    } else if image_aspect < target_aspect {
        // Taller than the target: keep full width, trim top and bottom
        let height = iw / target_aspect;
        (0.0, (ih - height) / 2.0, iw, height)
    } else {
        (0.0, 0.0, iw, ih)
    };

    Rect::new(left as f32, top as f32, width as f32, height as f32)
}

/// Dimensions that cover `target` while keeping the `source` aspect ratio,
/// never exceeding the source itself.
///
/// Used to downscale decoded photos before they are handed to the
/// compositor: one side matches the target, the other may exceed it.
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;
    if src_w == 0 || src_h == 0 || tgt_w == 0 || tgt_h == 0 {
        return source;
    }

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    let (w, h) = if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        ((h as f64 * src_aspect).round() as u32, h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        (w, (w as f64 / src_aspect).round() as u32)
    };

    if w >= src_w || h >= src_h {
        source
    } else {
        (w.max(1), h.max(1))
    }
}

/// Font sizes for a diary entry rendered into `format`.
pub fn text_sizes(format: ShareFormat, diary: &DiaryEntry) -> TextSizes {
    let title_len = diary.title.chars().count();
    let content_len = diary.content.chars().count();

    let title_base = if title_len <= TITLE_LONG_THRESHOLD {
        TITLE_BASE
    } else {
        TITLE_LONG_BASE
    };
    let title_max_lines = if title_len > TITLE_EXTENDED_THRESHOLD {
        TITLE_EXTENDED_MAX_LINES
    } else {
        TITLE_MAX_LINES
    };
    let content_base = if content_len <= CONTENT_LONG_THRESHOLD {
        CONTENT_BASE
    } else {
        CONTENT_LONG_BASE
    };

    TextSizes {
        date_size: scaled(format, DATE_BASE),
        title_size: scaled(format, title_base),
        title_max_lines,
        content_size: scaled(format, content_base),
        content_max_lines: None,
    }
}

pub fn spacing(format: ShareFormat) -> Spacing {
    Spacing {
        after_date: scaled(format, SPACING_AFTER_DATE),
        after_title: scaled(format, SPACING_AFTER_TITLE),
    }
}

pub fn brand_font_size(format: ShareFormat) -> u32 {
    scaled(format, BRAND_BASE)
}

/// The region of `text_rect` available to date, title and content.
///
/// Inset by the scaled padding, with a band at the bottom reserved for the
/// branding stamp.
pub fn text_content_area(format: ShareFormat, text_rect: Rect) -> Rect {
    let scale = scale_factor(format);
    let padded = text_rect.inset((TEXT_PADDING * scale).round());
    let brand_band = brand_font_size(format) as f32 * 1.5 + (BRAND_MARGIN * scale).round();
    Rect {
        height: (padded.height - brand_band).max(0.0),
        ..padded
    }
}
