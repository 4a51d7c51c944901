//! Shared test utilities for the diary-share test suite.
//!
//! Provides fixture builders, a deterministic typeface, and recording mocks
//! for the compositor's injected collaborators.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let entry = diary("Morning walk", "Coffee by the river.");
//! let photo = StubPhoto::managed(solid_png(300, 200, [200, 0, 0]));
//! let logger = RecordingLogger::new();
//!
//! // ... render ...
//!
//! assert!(logger.warnings().is_empty());
//! assert_eq!(photo.requests().len(), 1);
//! ```

use std::io::Cursor;
use std::sync::Mutex;

use chrono::NaiveDate;
use image::{ImageFormat, Rgb, RgbImage, Rgba};

use crate::compose::{Canvas, Quality, Rect, Typeface};
use crate::logger::{LogContext, ShareLogger};
use crate::types::{DiaryEntry, PhotoHandle, ThumbnailRequest};

// =========================================================================
// Fixtures
// =========================================================================

/// A diary entry dated 2024-03-07 21:15.
pub fn diary(title: &str, content: &str) -> DiaryEntry {
    DiaryEntry {
        title: title.to_string(),
        content: content.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(21, 15, 0)
            .unwrap(),
    }
}

/// PNG bytes of a solid-color image.
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(rgb));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

// =========================================================================
// Deterministic typeface
// =========================================================================

/// Every character is `size * 0.5` wide, ascent `0.8 * size`, descent
/// `-0.2 * size`. Non-space characters draw as solid boxes.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthFace;

impl FixedWidthFace {
    pub const ADVANCE: f32 = 0.5;
}

impl Typeface for FixedWidthFace {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * Self::ADVANCE
    }

    fn v_metrics(&self, size: f32) -> (f32, f32) {
        (size * 0.8, size * -0.2)
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
        let advance = size * Self::ADVANCE;
        let top = (baseline - size * 0.8).floor() as i32;
        let bottom = baseline.ceil() as i32;
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = (x + i as f32 * advance).floor() as i32;
            let right = (x + (i as f32 + 0.8) * advance).ceil() as i32;
            for py in top..bottom {
                for px in left..right {
                    canvas.blend(px, py, 1.0, color, clip);
                }
            }
        }
    }
}

// =========================================================================
// Photo stub
// =========================================================================

/// A [`PhotoHandle`] with canned bytes that records thumbnail requests.
#[derive(Default)]
pub struct StubPhoto {
    pub origin: Option<Vec<u8>>,
    pub managed: Option<Vec<u8>>,
    requests: Mutex<Vec<(ThumbnailRequest, u32)>>,
}

impl StubPhoto {
    /// Managed and origin paths both return `bytes`.
    pub fn managed(bytes: Vec<u8>) -> Self {
        Self {
            origin: Some(bytes.clone()),
            managed: Some(bytes),
            ..Self::default()
        }
    }

    /// Only the unmanaged origin bytes are available.
    pub fn origin_only(bytes: Vec<u8>) -> Self {
        Self {
            origin: Some(bytes),
            ..Self::default()
        }
    }

    /// Neither path returns bytes.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// `(request, quality)` for every managed fetch, in call order.
    pub fn requests(&self) -> Vec<(ThumbnailRequest, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

impl PhotoHandle for StubPhoto {
    fn fetch_origin_bytes(&self) -> Option<Vec<u8>> {
        self.origin.clone()
    }

    fn fetch_managed_thumbnail(
        &self,
        request: ThumbnailRequest,
        quality: Quality,
    ) -> Option<Vec<u8>> {
        self.requests
            .lock()
            .unwrap()
            .push((request, quality.value()));
        self.managed.clone()
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}

// =========================================================================
// Recording logger
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub message: String,
    pub context: Vec<(String, String)>,
}

impl LogRecord {
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str, value: &str) -> bool {
        self.context_value(key) == Some(value)
    }
}

/// A [`ShareLogger`] that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingLogger {
    warnings: Mutex<Vec<LogRecord>>,
    errors: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<LogRecord> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<LogRecord> {
        self.errors.lock().unwrap().clone()
    }
}

fn record(message: &str, context: LogContext<'_>) -> LogRecord {
    LogRecord {
        message: message.to_string(),
        context: context
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    }
}

impl ShareLogger for RecordingLogger {
    fn warning(&self, message: &str, context: LogContext<'_>) {
        self.warnings.lock().unwrap().push(record(message, context));
    }

    fn error(&self, message: &str, context: LogContext<'_>) {
        self.errors.lock().unwrap().push(record(message, context));
    }
}
