//! Display P3 → sRGB conversion for the color-managed decode path.
//!
//! Phone cameras tag photos with a Display P3 ICC profile. Drawing those
//! pixels as if they were sRGB desaturates them, so managed thumbnails are
//! converted: decode the P3 transfer curve (same as sRGB), apply the linear
//! P3→sRGB matrix, clip to gamut, re-encode.

use image::RgbaImage;
use std::sync::LazyLock;

/// Linear Display P3 → linear sRGB, D65 white in both.
const P3_TO_SRGB: [[f32; 3]; 3] = [
    [1.224_940_1, -0.224_940_4, 0.0],
    [-0.042_056_9, 1.042_057_1, 0.0],
    [-0.019_637_6, -0.078_636_1, 1.098_273_5],
];

static DECODE_LUT: LazyLock<[f32; 256]> = LazyLock::new(|| {
    let mut lut = [0.0; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = srgb_to_linear(i as f32 / 255.0);
    }
    lut
});

/// True when the ICC profile describes Display P3.
///
/// Profile descriptions are stored either as ASCII (`desc`) or UTF-16BE
/// (`mluc`); both are searched.
pub fn is_display_p3(icc: &[u8]) -> bool {
    const NAME: &str = "Display P3";
    if contains(icc, NAME.as_bytes()) {
        return true;
    }
    let utf16: Vec<u8> = NAME.encode_utf16().flat_map(u16::to_be_bytes).collect();
    contains(icc, &utf16)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.040_45 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(v: f32) -> f32 {
    let v = v.clamp(0.0, 1.0);
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert an 8-bit Display P3 image to sRGB in place. Alpha is untouched.
pub fn convert_p3_to_srgb(image: &mut RgbaImage) {
    let lut = &*DECODE_LUT;
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let linear = [lut[r as usize], lut[g as usize], lut[b as usize]];
        for (channel, row) in pixel.0.iter_mut().zip(P3_TO_SRGB) {
            let mixed = row[0] * linear[0] + row[1] * linear[1] + row[2] * linear[2];
            *channel = (linear_to_srgb(mixed) * 255.0).round() as u8;
        }
    }
}
