//! The share-image pipeline.
//!
//! ```text
//! canvas → split → photos (or placeholder) → text fit → paint → branding → encode
//! ```
//!
//! One sequential pass per call, no shared state. Recoverable problems
//! (a photo that cannot be fetched or decoded, too many photos) go to the
//! injected [`ShareLogger`]; the render still succeeds. Only an invalid
//! color config or a failed encode aborts it.

use crate::compose::{
    Canvas, FitOutcome, ShareFormat, Typefaces, draw_branding, draw_photos, fit_text, paint_text,
    split_layout, text_content_area,
};
use crate::compose::{FontError, PhotoReport};
use crate::config::{ConfigError, OutputEncoding, ShareConfig};
use crate::dates::DateFormatter;
use crate::logger::ShareLogger;
use crate::types::{DiaryEntry, PhotoHandle};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, RgbaImage};
use log::debug;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encode failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Font error: {0}")]
    Font(#[from] FontError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Injected collaborators for one render.
pub struct RenderEnv<'a> {
    pub config: &'a ShareConfig,
    pub faces: &'a Typefaces,
    pub logger: &'a dyn ShareLogger,
    pub dates: &'a dyn DateFormatter,
}

/// An encoded share image.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub encoding: OutputEncoding,
    pub photo_report: PhotoReport,
    pub text_outcome: FitOutcome,
}

impl RenderedImage {
    pub fn write_to(&self, path: &Path) -> Result<(), ShareError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Render `diary` and `photos` into a `format` share image.
pub fn render_share_image(
    diary: &DiaryEntry,
    photos: &[&dyn PhotoHandle],
    format: ShareFormat,
    env: &RenderEnv<'_>,
) -> Result<RenderedImage, ShareError> {
    let colors = env.config.colors.resolve()?;
    let faces = env.faces.faces();
    let mut canvas = Canvas::new(format, colors.background);
    let split = split_layout(format);
    debug!(
        "{format}: {}x{} photo {:?} text {:?}",
        format.width(),
        format.height(),
        split.photo_rect,
        split.text_rect
    );

    let photo_report = if photos.is_empty() {
        canvas.fill_rect(split.photo_rect, colors.placeholder);
        PhotoReport::default()
    } else {
        draw_photos(
            &mut canvas,
            photos,
            split.photo_rect,
            format,
            &env.config.photo_options(),
            env.logger,
        )
    };

    let area = text_content_area(format, split.text_rect);
    let date_label = env.dates.format_short(&diary.date, &env.config.locale);
    let layout = fit_text(diary, &date_label, format, area, faces);
    paint_text(&mut canvas, &layout, faces, &colors.palette);
    draw_branding(
        &mut canvas,
        format,
        split.text_rect,
        faces.heading,
        colors.palette.brand,
    );

    let encoding = env.config.output.encoding;
    let bytes = encode(canvas.into_image(), encoding, env.config.output.quality)
        .inspect_err(|e| {
            env.logger
                .error("share image encode failed", &[("error", e.to_string())])
        })?;

    Ok(RenderedImage {
        bytes,
        width: format.width(),
        height: format.height(),
        encoding,
        photo_report,
        text_outcome: layout.outcome,
    })
}

fn encode(image: RgbaImage, encoding: OutputEncoding, quality: u32) -> Result<Vec<u8>, ShareError> {
    let (width, height) = image.dimensions();
    let mut out = Vec::new();
    match encoding {
        OutputEncoding::Png => {
            PngEncoder::new(&mut out).write_image(
                image.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgba8,
            )?;
        }
        OutputEncoding::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100) as u8).write_image(
                rgb.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgb8,
            )?;
        }
    }
    Ok(out)
}
