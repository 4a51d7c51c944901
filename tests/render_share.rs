//! End-to-end renders through the public API with the embedded fonts.

use std::io::Cursor;
use std::sync::Mutex;

use chrono::NaiveDate;
use diary_share::compose::{
    FitOutcome, Quality, ShareFormat, Typefaces, split_layout,
};
use diary_share::config::{OutputEncoding, ShareConfig};
use diary_share::dates::ShortDateFormatter;
use diary_share::logger::{LogContext, ShareLogger};
use diary_share::photo::InMemoryPhoto;
use diary_share::render::{RenderEnv, RenderedImage, render_share_image};
use diary_share::types::{DiaryEntry, PhotoHandle, ThumbnailRequest};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

#[derive(Default)]
struct CountingLogger {
    warnings: Mutex<Vec<String>>,
}

impl ShareLogger for CountingLogger {
    fn warning(&self, message: &str, _: LogContext<'_>) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str, _: LogContext<'_>) {
        panic!("unexpected error log: {message}");
    }
}

/// A photo whose bytes are gone (deleted from the library, say).
struct MissingPhoto;

impl PhotoHandle for MissingPhoto {
    fn fetch_origin_bytes(&self) -> Option<Vec<u8>> {
        None
    }

    fn fetch_managed_thumbnail(&self, _: ThumbnailRequest, _: Quality) -> Option<Vec<u8>> {
        None
    }
}

fn png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbImage::from_pixel(width, height, Rgb(rgb))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// PNG whose iCCP chunk names Display P3.
fn display_p3_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let mut icc = vec![0u8; 128];
    icc.extend_from_slice(b"descDisplay P3");
    let img = RgbImage::from_pixel(width, height, Rgb(rgb));
    let mut out = Vec::new();
    let mut encoder = PngEncoder::new(&mut out);
    encoder.set_icc_profile(icc).unwrap();
    encoder
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

fn entry(title: &str, content: &str) -> DiaryEntry {
    DiaryEntry {
        title: title.to_string(),
        content: content.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 10, 3)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap(),
    }
}

fn render(
    diary: &DiaryEntry,
    photos: &[&dyn PhotoHandle],
    format: ShareFormat,
    config: &ShareConfig,
    logger: &CountingLogger,
) -> RenderedImage {
    let faces = Typefaces::embedded().unwrap();
    let env = RenderEnv {
        config,
        faces: &faces,
        logger,
        dates: &ShortDateFormatter,
    };
    render_share_image(diary, photos, format, &env).unwrap()
}

#[test]
fn every_format_renders_at_its_exact_size() {
    let config = ShareConfig::default();
    let logger = CountingLogger::default();
    let photo = InMemoryPhoto::new(png(640, 480, [90, 120, 150]));
    let diary = entry("Autumn", "Leaves everywhere on the way to work.");

    for format in ShareFormat::ALL {
        let image = render(&diary, &[&photo], format, &config, &logger);
        let decoded = image::load_from_memory(&image.bytes).unwrap();
        assert_eq!(
            (decoded.width(), decoded.height()),
            (format.width(), format.height()),
            "{format}"
        );
        assert_eq!(image.text_outcome, FitOutcome::Fitted { shrink_steps: 0 });
    }
    assert!(logger.warnings.lock().unwrap().is_empty());
}

#[test]
fn square_puts_photos_left_and_portrait_puts_them_on_top() {
    let square = split_layout(ShareFormat::Square);
    assert_eq!(square.photo_rect.left, 0.0);
    assert!(square.text_rect.left > square.photo_rect.right());

    let portrait = split_layout(ShareFormat::Portrait);
    assert_eq!(portrait.photo_rect.top, 0.0);
    assert!(portrait.text_rect.top > portrait.photo_rect.bottom());
}

#[test]
fn missing_photo_is_skipped_and_render_succeeds() {
    let config = ShareConfig::default();
    let logger = CountingLogger::default();
    let a = InMemoryPhoto::new(png(300, 300, [200, 40, 40]));
    let b = InMemoryPhoto::new(png(300, 300, [40, 40, 200]));
    let photos: Vec<&dyn PhotoHandle> = vec![&a, &MissingPhoto, &b];

    let image = render(&entry("Trip", "Day two."), &photos, ShareFormat::Portrait, &config, &logger);

    assert_eq!(image.photo_report.drawn.len(), 2);
    assert_eq!(image.photo_report.skipped, vec![1]);
    assert_eq!(logger.warnings.lock().unwrap().len(), 1);
}

#[test]
fn in_memory_display_p3_photo_is_drawn_in_srgb() {
    let config = ShareConfig::default();
    let logger = CountingLogger::default();
    let photo = InMemoryPhoto::new(display_p3_png(64, 64, [200, 100, 50]));

    let image = render(&entry("Sunset", "Orange sky."), &[&photo], ShareFormat::Square, &config, &logger);

    let decoded = image::load_from_memory(&image.bytes).unwrap().to_rgb8();
    let [r, _, b] = decoded.get_pixel(300, 540).0;
    assert!(r > 200 && b < 50, "photo drawn without conversion: {:?}", [r, b]);
}

#[test]
fn very_long_entries_still_render() {
    let config = ShareConfig::default();
    let logger = CountingLogger::default();
    let diary = entry(
        &"A very long title that keeps going ".repeat(4),
        &"Today I wrote far too much. ".repeat(400),
    );

    for format in [ShareFormat::Square, ShareFormat::Portrait] {
        let image = render(&diary, &[], format, &config, &logger);
        assert!(matches!(image.text_outcome, FitOutcome::Truncated { .. }), "{format}");
        assert!(image.text_outcome.shrink_steps() <= 24);
    }
}

#[test]
fn jpeg_output_written_to_disk() {
    let tmp = TempDir::new().unwrap();
    let mut config = ShareConfig::default();
    config.output.encoding = OutputEncoding::Jpeg;
    config.locale = "ko-KR".into();
    let logger = CountingLogger::default();

    let image = render(&entry("오늘", "산책을 했다."), &[], ShareFormat::Square, &config, &logger);
    let path = tmp.path().join("share.jpg");
    image.write_to(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
}
