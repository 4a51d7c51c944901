//! [`PhotoHandle`] implementations for photos that live on disk or in
//! memory.
//!
//! The managed thumbnail path does what the platform photo library would:
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` |
//! | EXIF orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Display P3 → sRGB | [`color::convert_p3_to_srgb`] when the ICC profile names P3 |
//! | Downscale to cover | `imageops::resize` with `Lanczos3`, never upscaling |
//! | Encode | `JpegEncoder` at the requested quality |

pub mod color;

use crate::compose::{Quality, calculate_fill_dimensions};
use crate::types::{PhotoHandle, ThumbnailRequest};
use color::{convert_p3_to_srgb, is_display_p3};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};
use log::{debug, warn};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManagedDecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Decode `bytes` into an sRGB JPEG that covers `request`.
pub fn managed_thumbnail(
    bytes: &[u8],
    request: ThumbnailRequest,
    quality: Quality,
) -> Result<Vec<u8>, ManagedDecodeError> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let icc = decoder.icc_profile()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);

    // 16-bit and float sources are normalised to 8-bit here
    let mut rgba = image.to_rgba8();
    if icc.as_deref().is_some_and(is_display_p3) {
        debug!("Display P3 profile found, converting to sRGB");
        convert_p3_to_srgb(&mut rgba);
    }

    let source = rgba.dimensions();
    let (w, h) = calculate_fill_dimensions(source, (request.width, request.height));
    let rgba = if (w, h) == source {
        rgba
    } else {
        image::imageops::resize(&rgba, w, h, FilterType::Lanczos3)
    };

    let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.as_u8()).encode_image(&rgb)?;
    Ok(out)
}

/// A photo file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePhoto {
    path: PathBuf,
}

impl FilePhoto {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PhotoHandle for FilePhoto {
    fn fetch_origin_bytes(&self) -> Option<Vec<u8>> {
        std::fs::read(&self.path)
            .map_err(|e| warn!("{}: {e}", self.path.display()))
            .ok()
    }

    fn fetch_managed_thumbnail(
        &self,
        request: ThumbnailRequest,
        quality: Quality,
    ) -> Option<Vec<u8>> {
        let bytes = self.fetch_origin_bytes()?;
        managed_thumbnail(&bytes, request, quality)
            .map_err(|e| debug!("{}: managed decode failed: {e}", self.path.display()))
            .ok()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Already-encoded photo bytes. The origin path returns them as-is; the
/// managed path runs them through [`managed_thumbnail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryPhoto {
    bytes: Vec<u8>,
}

impl InMemoryPhoto {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl PhotoHandle for InMemoryPhoto {
    fn fetch_origin_bytes(&self) -> Option<Vec<u8>> {
        Some(self.bytes.clone())
    }

    fn fetch_managed_thumbnail(
        &self,
        request: ThumbnailRequest,
        quality: Quality,
    ) -> Option<Vec<u8>> {
        managed_thumbnail(&self.bytes, request, quality)
            .map_err(|e| debug!("in-memory photo: managed decode failed: {e}"))
            .ok()
    }

    fn describe(&self) -> String {
        format!("in-memory ({} bytes)", self.bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::solid_png;
    use image::ImageEncoder;
    use image::codecs::png::PngEncoder;
    use tempfile::TempDir;

    fn request(width: u32, height: u32) -> ThumbnailRequest {
        ThumbnailRequest { width, height }
    }

    fn decode(bytes: &[u8]) -> DynamicImage {
        image::load_from_memory(bytes).unwrap()
    }

    /// Minimal ICC-shaped blob whose description names `name` in ASCII.
    fn profile(name: &str) -> Vec<u8> {
        let mut icc = vec![0u8; 128];
        icc.extend_from_slice(b"desc");
        icc.extend_from_slice(name.as_bytes());
        icc
    }

    fn p3_profile() -> Vec<u8> {
        profile("Display P3")
    }

    /// 16x16 PNG of one color carrying `icc` in an iCCP chunk.
    fn tagged_png(rgb: [u8; 3], icc: &[u8]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(16, 16, image::Rgb(rgb));
        let mut out = Vec::new();
        let mut encoder = PngEncoder::new(&mut out);
        encoder.set_icc_profile(icc.to_vec()).unwrap();
        encoder
            .write_image(img.as_raw(), 16, 16, image::ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    // =========================================================================
    // managed_thumbnail tests
    // =========================================================================

    #[test]
    fn managed_thumbnail_is_jpeg() {
        let out = managed_thumbnail(&solid_png(64, 48, [10, 20, 30]), request(32, 24), Quality::new(80)).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn managed_thumbnail_downscales_to_cover() {
        // 400x100 into a 50x50 cell: height matches, width overflows
        let out = managed_thumbnail(&solid_png(400, 100, [0, 0, 0]), request(50, 50), Quality::new(90)).unwrap();
        let img = decode(&out);
        assert_eq!((img.width(), img.height()), (200, 50));
    }

    #[test]
    fn managed_thumbnail_never_upscales() {
        let out = managed_thumbnail(&solid_png(40, 30, [0, 0, 0]), request(800, 600), Quality::new(90)).unwrap();
        let img = decode(&out);
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn managed_thumbnail_keeps_srgb_colors() {
        let out = managed_thumbnail(&solid_png(16, 16, [120, 120, 120]), request(16, 16), Quality::new(100)).unwrap();
        let p = decode(&out).to_rgb8().get_pixel(8, 8).0;
        for c in p {
            assert!(c.abs_diff(120) <= 2, "{p:?}");
        }
    }

    #[test]
    fn managed_thumbnail_converts_display_p3_to_srgb() {
        let out = managed_thumbnail(&tagged_png([200, 100, 50], &p3_profile()), request(16, 16), Quality::new(100)).unwrap();
        let [r, g, b] = decode(&out).to_rgb8().get_pixel(8, 8).0;
        // P3 red is outside sRGB, so the sRGB encoding is more saturated
        assert!(r > 200, "red {r}");
        assert!(b < 50, "blue {b}");
        assert!(g < 100, "green {g}");
    }

    #[test]
    fn managed_thumbnail_leaves_srgb_tagged_pixels_alone() {
        let out = managed_thumbnail(&tagged_png([200, 100, 50], &profile("sRGB IEC61966-2.1")), request(16, 16), Quality::new(100)).unwrap();
        let p = decode(&out).to_rgb8().get_pixel(8, 8).0;
        for (c, want) in p.into_iter().zip([200u8, 100, 50]) {
            assert!(c.abs_diff(want) <= 3, "{p:?}");
        }
    }

    #[test]
    fn file_photo_converts_display_p3() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("p3.png");
        std::fs::write(&path, tagged_png([200, 100, 50], &p3_profile())).unwrap();
        let managed = FilePhoto::new(&path)
            .fetch_managed_thumbnail(request(16, 16), Quality::new(100))
            .unwrap();
        let [r, _, b] = decode(&managed).to_rgb8().get_pixel(8, 8).0;
        assert!(r > 200 && b < 50, "{:?}", [r, b]);
    }

    #[test]
    fn managed_thumbnail_rejects_garbage() {
        assert!(managed_thumbnail(b"not an image", request(10, 10), Quality::default()).is_err());
    }

    // =========================================================================
    // FilePhoto / InMemoryPhoto tests
    // =========================================================================

    #[test]
    fn file_photo_reads_origin_and_managed_bytes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.png");
        let png = solid_png(30, 20, [200, 10, 10]);
        std::fs::write(&path, &png).unwrap();

        let photo = FilePhoto::new(&path);
        assert_eq!(photo.fetch_origin_bytes(), Some(png));
        let managed = photo.fetch_managed_thumbnail(request(15, 10), Quality::new(90)).unwrap();
        assert_eq!(decode(&managed).width(), 15);
        assert!(photo.describe().ends_with("photo.png"));
    }

    #[test]
    fn missing_file_yields_none() {
        let photo = FilePhoto::new("/nonexistent/photo.jpg");
        assert!(photo.fetch_origin_bytes().is_none());
        assert!(photo.fetch_managed_thumbnail(request(10, 10), Quality::default()).is_none());
    }

    #[test]
    fn in_memory_photo_origin_is_raw_and_managed_is_decoded() {
        let png = solid_png(40, 20, [30, 60, 90]);
        let photo = InMemoryPhoto::new(png.clone());
        assert_eq!(photo.fetch_origin_bytes(), Some(png));
        let managed = photo.fetch_managed_thumbnail(request(20, 10), Quality::new(90)).unwrap();
        assert_eq!(image::guess_format(&managed).unwrap(), image::ImageFormat::Jpeg);
        assert_eq!(decode(&managed).width(), 20);
    }

    #[test]
    fn in_memory_garbage_has_no_managed_thumbnail() {
        let photo = InMemoryPhoto::new(vec![1, 2, 3]);
        assert_eq!(photo.fetch_origin_bytes(), Some(vec![1, 2, 3]));
        assert!(photo.fetch_managed_thumbnail(request(1, 1), Quality::default()).is_none());
    }

    #[test]
    fn in_memory_p3_photo_is_converted_on_the_managed_path() {
        let photo = InMemoryPhoto::new(tagged_png([200, 100, 50], &p3_profile()));
        let managed = photo.fetch_managed_thumbnail(request(16, 16), Quality::new(100)).unwrap();
        let [r, _, b] = decode(&managed).to_rgb8().get_pixel(8, 8).0;
        assert!(r > 200 && b < 50, "{:?}", [r, b]);
    }
}
