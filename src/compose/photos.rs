//! Photo compositor: up to three photos cropped to fill a grid of cells.
//!
//! | Photos | Layout |
//! |---|---|
//! | 1 | one cell covering the whole area |
//! | 2 | side by side on square formats, stacked on portrait formats |
//! | 3 | two cells across the top 55%, one full-width cell below |
//!
//! Photos are processed strictly one at a time (fetch → decode → draw →
//! drop) so at most one decoded image is alive at any moment. A photo whose
//! bytes are missing or undecodable is logged and its cell left empty; the
//! render carries on with the rest.

use super::canvas::Canvas;
use super::format::ShareFormat;
use super::geometry::{Rect, crop_rect};
use super::params::Quality;
use crate::logger::ShareLogger;
use crate::types::{PhotoHandle, ThumbnailRequest};
use image::DynamicImage;
use image::imageops::FilterType;
use log::debug;
use thiserror::Error;

pub const MAX_PHOTOS: usize = 3;
const PHOTO_GAP: u32 = 8;
const THREE_UP_TOP_RATIO: f32 = 0.55;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("no bytes available")]
    Unavailable,
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("cell {0}x{1} is too small to draw into")]
    EmptyCell(u32, u32),
}

/// How photo bytes are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoOptions {
    pub quality: Quality,
    /// Fall back to the unmanaged origin bytes when the managed thumbnail
    /// is unavailable. Colors may shift on wide-gamut sources.
    pub origin_fallback: bool,
}

impl Default for PhotoOptions {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            origin_fallback: false,
        }
    }
}

/// What [`draw_photos`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoReport {
    /// Cells that received a photo, in input order.
    pub drawn: Vec<Rect>,
    /// Input indices of photos that were skipped.
    pub skipped: Vec<usize>,
}

/// Gap between photo cells.
pub fn photo_gap(format: ShareFormat) -> u32 {
    PHOTO_GAP * format.hd_scale()
}

/// Split a length into two parts around a gap; the first gets the floor.
fn split_two(length: f32, gap: f32) -> (f32, f32) {
    let first = ((length - gap) / 2.0).floor().max(0.0);
    (first, (length - gap - first).max(0.0))
}

/// Cells for `count` photos inside `area`. Counts above [`MAX_PHOTOS`] are
/// treated as [`MAX_PHOTOS`].
pub fn photo_cells(count: usize, area: Rect, format: ShareFormat) -> Vec<Rect> {
    let gap = photo_gap(format) as f32;
    let Rect {
        left,
        top,
        width,
        height,
    } = area;

    match count.min(MAX_PHOTOS) {
        0 => Vec::new(),
        1 => vec![area],
        2 if format.is_square() => {
            let (a, b) = split_two(width, gap);
            vec![
                Rect::new(left, top, a, height),
                Rect::new(left + a + gap, top, b, height),
            ]
        }
        2 => {
            let (a, b) = split_two(height, gap);
            vec![
                Rect::new(left, top, width, a),
                Rect::new(left, top + a + gap, width, b),
            ]
        }
        _ => {
            let top_h = (height * THREE_UP_TOP_RATIO).round();
            let bottom_h = (height - top_h - gap).max(0.0);
            let (a, b) = split_two(width, gap);
            vec![
                Rect::new(left, top, a, top_h),
                Rect::new(left + a + gap, top, b, top_h),
                Rect::new(left, top + top_h + gap, width, bottom_h),
            ]
        }
    }
}

/// Compose `photos` into `area`, one at a time.
pub fn draw_photos(
    canvas: &mut Canvas,
    photos: &[&dyn PhotoHandle],
    area: Rect,
    format: ShareFormat,
    options: &PhotoOptions,
    logger: &dyn ShareLogger,
) -> PhotoReport {
    if photos.len() > MAX_PHOTOS {
        logger.warning(
            "too many photos; extra photos ignored",
            &[
                ("supplied", photos.len().to_string()),
                ("max", MAX_PHOTOS.to_string()),
            ],
        );
    }
    let photos = &photos[..photos.len().min(MAX_PHOTOS)];
    let cells = photo_cells(photos.len(), area, format);
    let mut report = PhotoReport::default();

    for (index, (photo, cell)) in photos.iter().zip(cells).enumerate() {
        match load_photo(*photo, cell, options) {
            Ok(image) => {
                draw_cropped(canvas, &image, cell);
                // Release before the next photo is fetched
                drop(image);
                report.drawn.push(cell);
            }
            Err(e) => {
                logger.warning(
                    "photo skipped",
                    &[
                        ("index", index.to_string()),
                        ("photo", photo.describe()),
                        ("reason", e.to_string()),
                    ],
                );
                report.skipped.push(index);
            }
        }
    }

    report
}

/// Fetch and decode the bytes for one cell.
fn load_photo(
    photo: &dyn PhotoHandle,
    cell: Rect,
    options: &PhotoOptions,
) -> Result<DynamicImage, PhotoError> {
    let (_, _, width, height) = cell.to_pixels();
    if width == 0 || height == 0 {
        return Err(PhotoError::EmptyCell(width, height));
    }

    let request = ThumbnailRequest { width, height };
    let bytes = match photo.fetch_managed_thumbnail(request, options.quality) {
        Some(bytes) => bytes,
        None if options.origin_fallback => {
            debug!("{}: managed thumbnail unavailable, using origin bytes", photo.describe());
            photo.fetch_origin_bytes().ok_or(PhotoError::Unavailable)?
        }
        None => return Err(PhotoError::Unavailable),
    };
    if bytes.is_empty() {
        return Err(PhotoError::Unavailable);
    }

    let image = image::load_from_memory(&bytes)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(PhotoError::Unavailable);
    }
    Ok(image)
}

/// Crop `image` to the cell's aspect ratio around its center, scale it to
/// the cell and paste it.
fn draw_cropped(canvas: &mut Canvas, image: &DynamicImage, cell: Rect) {
    let (cx, cy, cw, ch) = cell.to_pixels();
    let crop = crop_rect(image.width(), image.height(), cw, ch);
    let (sx, sy, sw, sh) = crop.to_pixels();
    let sx = sx.min(image.width() - 1);
    let sy = sy.min(image.height() - 1);
    let sw = sw.clamp(1, image.width() - sx);
    let sh = sh.clamp(1, image.height() - sy);

    debug!(
        "photo {}x{} → crop {sw}x{sh}+{sx}+{sy} → cell {cw}x{ch}+{cx}+{cy}",
        image.width(),
        image.height()
    );

    let filled = image
        .crop_imm(sx, sy, sw, sh)
        .resize_exact(cw, ch, FilterType::Lanczos3)
        .to_rgba8();
    canvas.paste(&filled, cx, cy);
}
