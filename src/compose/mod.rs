//! Share-image composition.
//!
//! | Stage | Module | Function |
//! |---|---|---|
//! | **Split** | [`geometry`] | [`split_layout`]: photo rect and text rect |
//! | **Photos** | [`photos`] | [`draw_photos`]: crop-to-fill into 1–3 cells |
//! | **Text** | [`text`] | [`fit_text`] + [`paint_text`]: shrink-to-fit, then truncate |
//! | **Branding** | [`text`] | [`draw_branding`]: right-aligned stamp |
//!
//! The module is split into:
//! - **Format & geometry**: pure functions for sizes and rects (unit testable)
//! - **Parameters**: data structures describing what to draw
//! - **Canvas & typeface**: the pixel surface and the [`Typeface`] trait
//!   the text compositor draws through
//! - **Compositors**: photos and text, combining geometry with pixels

pub mod canvas;
pub mod format;
pub mod geometry;
mod params;
pub mod photos;
pub mod text;
pub mod typeface;
mod wrap;

pub use canvas::Canvas;
pub use format::{FormatParseError, ShareFormat};
pub use geometry::{
    Rect, brand_font_size, calculate_fill_dimensions, crop_rect, spacing, split_layout,
    text_content_area, text_sizes,
};
pub use params::{LayoutSplit, Quality, Spacing, TextSizes};
pub use photos::{PhotoOptions, PhotoReport, draw_photos, photo_cells};
pub use text::{
    BRAND_TEXT, FitOutcome, Palette, TextLayout, TextRole, draw_branding, fit_text, paint_text,
};
pub use typeface::{FaceSet, FontError, FontFace, Typeface, Typefaces};
