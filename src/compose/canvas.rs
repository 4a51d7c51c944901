//! The drawing surface and its pixel primitives.
//!
//! A [`Canvas`] is an opaque RGBA buffer sized to one [`ShareFormat`]. All
//! writes are clipped to the buffer, so callers may hand in rects or glyph
//! coverage that spill past an edge.

use super::format::ShareFormat;
use super::geometry::Rect;
use image::{Rgba, RgbaImage};

pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// A canvas of exactly `format`'s pixel size filled with `background`.
    pub fn new(format: ShareFormat, background: Rgba<u8>) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(format.width(), format.height(), background),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let (x, y, w, h) = rect.to_pixels();
        let x_end = (x + w).min(self.width());
        let y_end = (y + h).min(self.height());
        for py in y..y_end {
            for px in x..x_end {
                self.pixels.put_pixel(px, py, color);
            }
        }
    }

    /// Copy `image` with its top-left corner at `(x, y)`, clipped to the canvas.
    pub fn paste(&mut self, image: &RgbaImage, x: u32, y: u32) {
        image::imageops::replace(&mut self.pixels, image, x as i64, y as i64);
    }

    /// Blend `color` at `(x, y)` with the given coverage (0.0–1.0), if the
    /// point lies inside both the canvas and `clip`.
    pub fn blend(&mut self, x: i32, y: i32, coverage: f32, color: Rgba<u8>, clip: &Rect) {
        if x < 0 || y < 0 {
            return;
        }
        let (fx, fy) = (x as f32, y as f32);
        if fx < clip.left.floor() || fy < clip.top.floor() || fx >= clip.right().ceil() || fy >= clip.bottom().ceil() {
            return;
        }
        let (ux, uy) = (x as u32, y as u32);
        if ux >= self.width() || uy >= self.height() {
            return;
        }
        let alpha = (coverage.clamp(0.0, 1.0) * color[3] as f32).round() as u8;
        if alpha == 0 {
            return;
        }
        let overlay = Rgba([color[0], color[1], color[2], alpha]);
        blend_pixel(self.pixels.get_pixel_mut(ux, uy), &overlay);
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

/// Source-over blend of `overlay` onto an opaque `base`.
fn blend_pixel(base: &mut Rgba<u8>, overlay: &Rgba<u8>) {
    let alpha = overlay[3] as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }

    let inv_alpha = 1.0 - alpha;
    for idx in 0..3 {
        base[idx] = (overlay[idx] as f32 * alpha + base[idx] as f32 * inv_alpha)
            .round()
            .clamp(0.0, 255.0) as u8;
    }
    base[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn new_canvas_matches_format() {
        let canvas = Canvas::new(ShareFormat::Square, WHITE);
        assert_eq!((canvas.width(), canvas.height()), (1080, 1080));
        assert_eq!(canvas.pixel(500, 500), WHITE);
    }

    #[test]
    fn fill_rect_is_clipped_to_canvas() {
        let mut canvas = Canvas::new(ShareFormat::Square, WHITE);
        canvas.fill_rect(Rect::new(1000.0, 1000.0, 500.0, 500.0), BLACK);
        assert_eq!(canvas.pixel(1079, 1079), BLACK);
        assert_eq!(canvas.pixel(999, 999), WHITE);
    }

    #[test]
    fn blend_half_coverage_mixes_colors() {
        let mut canvas = Canvas::new(ShareFormat::Square, WHITE);
        let clip = Rect::new(0.0, 0.0, 10.0, 10.0);
        canvas.blend(5, 5, 0.5, BLACK, &clip);
        let p = canvas.pixel(5, 5);
        assert!(p[0] > 120 && p[0] < 135, "{p:?}");
        assert_eq!(p[3], 255);
    }

    #[test]
    fn blend_outside_clip_is_ignored() {
        let mut canvas = Canvas::new(ShareFormat::Square, WHITE);
        let clip = Rect::new(0.0, 0.0, 10.0, 10.0);
        canvas.blend(10, 5, 1.0, BLACK, &clip);
        canvas.blend(-1, 5, 1.0, BLACK, &clip);
        assert_eq!(canvas.pixel(10, 5), WHITE);
    }

    #[test]
    fn paste_copies_pixels_at_offset() {
        let mut canvas = Canvas::new(ShareFormat::Square, WHITE);
        let patch = RgbaImage::from_pixel(4, 4, BLACK);
        canvas.paste(&patch, 100, 200);
        assert_eq!(canvas.pixel(103, 203), BLACK);
        assert_eq!(canvas.pixel(104, 203), WHITE);
    }
}
