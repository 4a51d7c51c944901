//! Values and capabilities the compositor consumes from the rest of the app.
//!
//! The diary record is a plain immutable value. Photos are opaque handles
//! owned by the caller: the compositor only borrows them for the duration
//! of one render and asks them for bytes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A diary entry as stored by the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub title: String,
    /// Free text of any length.
    pub content: String,
    pub date: NaiveDateTime,
}

/// Target size for a platform thumbnail, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub width: u32,
    pub height: u32,
}

/// A photo the compositor can fetch bytes for.
///
/// `fetch_managed_thumbnail` is the color-managed path: implementations
/// must return pixels already converted to sRGB (wide-gamut sources such as
/// Display P3 look visibly wrong otherwise), at least as large as
/// `request` unless the source is smaller. `fetch_origin_bytes` is the raw
/// file, with no conversion.
///
/// Either call may return `None` when the bytes are unavailable; the
/// compositor treats that as a skipped photo, not an error.
pub trait PhotoHandle {
    fn fetch_origin_bytes(&self) -> Option<Vec<u8>>;

    fn fetch_managed_thumbnail(
        &self,
        request: ThumbnailRequest,
        quality: crate::compose::Quality,
    ) -> Option<Vec<u8>>;

    /// Short human-readable identifier used in log context.
    fn describe(&self) -> String {
        "photo".to_string()
    }
}
