//! Text measurement and rasterisation.
//!
//! The [`Typeface`] trait is the seam between the text compositor and the
//! font engine: the fitting loop only needs widths and vertical metrics, and
//! painting only needs a way to put a line of glyphs on the canvas. The
//! production implementation is [`FontFace`] (`rusttype`); tests use a
//! fixed-advance face so line breaking is predictable.
//!
//! DejaVu Sans (regular and bold) is embedded in the binary, so rendering
//! never depends on system fonts. Other TrueType/OpenType files can be
//! loaded with [`FontFace::from_file`].

use super::canvas::Canvas;
use super::geometry::Rect;
use image::Rgba;
use rusttype::{Font, Scale, point};
use std::path::Path;
use thiserror::Error;

static DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static DEJAVU_SANS_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

#[derive(Error, Debug)]
pub enum FontError {
    #[error("IO error reading font {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse font: {0}")]
    Parse(String),
}

/// Measures and draws single lines of text.
pub trait Typeface {
    /// Advance width of `text` at `size` pixels.
    fn text_width(&self, text: &str, size: f32) -> f32;

    /// `(ascent, descent)` at `size` pixels; descent is negative.
    fn v_metrics(&self, size: f32) -> (f32, f32);

    /// Draw `text` with its baseline at `baseline` and its origin at `x`.
    /// Coverage outside `clip` is discarded.
    #[allow(clippy::too_many_arguments)]
    fn draw_line(
        &self,
        canvas: &mut Canvas,
        text: &str,
        size: f32,
        x: f32,
        baseline: f32,
        color: Rgba<u8>,
        clip: &Rect,
    );
}

/// A `rusttype` font.
pub struct FontFace {
    font: Font<'static>,
}

impl FontFace {
    pub fn from_static(bytes: &'static [u8], name: &str) -> Result<Self, FontError> {
        Font::try_from_bytes(bytes)
            .map(|font| Self { font })
            .ok_or_else(|| FontError::Parse(name.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Font::try_from_vec(bytes)
            .map(|font| Self { font })
            .ok_or_else(|| FontError::Parse(path.display().to_string()))
    }
}

impl Typeface for FontFace {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let scale = Scale::uniform(size);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn v_metrics(&self, size: f32) -> (f32, f32) {
        let v = self.font.v_metrics(Scale::uniform(size));
        (v.ascent, v.descent)
    }

    fn draw_line(
        &self,
        canvas: &mut Canvas,
        text: &str,
        size: f32,
        x: f32,
        baseline: f32,
        color: Rgba<u8>,
        clip: &Rect,
    ) {
        let scale = Scale::uniform(size);
        for glyph in self.font.layout(text, scale, point(x, baseline)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    canvas.blend(
                        bb.min.x + gx as i32,
                        bb.min.y + gy as i32,
                        coverage,
                        color,
                        clip,
                    );
                });
            }
        }
    }
}

/// The regular and bold faces used by the text compositor.
pub struct Typefaces {
    pub regular: FontFace,
    pub bold: FontFace,
}

impl Typefaces {
    /// The embedded DejaVu Sans pair.
    pub fn embedded() -> Result<Self, FontError> {
        Self::load(None, None)
    }

    /// Embedded faces, with either one replaced by a font file when given.
    pub fn load(regular: Option<&Path>, bold: Option<&Path>) -> Result<Self, FontError> {
        let regular = match regular {
            Some(path) => FontFace::from_file(path)?,
            None => FontFace::from_static(DEJAVU_SANS, "DejaVu Sans")?,
        };
        let bold = match bold {
            Some(path) => FontFace::from_file(path)?,
            None => FontFace::from_static(DEJAVU_SANS_BOLD, "DejaVu Sans Bold")?,
        };
        Ok(Self { regular, bold })
    }

    pub fn faces(&self) -> FaceSet<'_> {
        FaceSet {
            body: &self.regular,
            heading: &self.bold,
        }
    }
}

/// Borrowed faces by role: `body` for date and content, `heading` for the
/// title and the branding stamp.
#[derive(Clone, Copy)]
pub struct FaceSet<'a> {
    pub body: &'a dyn Typeface,
    pub heading: &'a dyn Typeface,
}
