//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! Rendered portrait 1080x1920 png → share.png
//!     Photos: 2 drawn, 1 skipped (#2)
//!     Text: fitted after 3 shrink steps
//! ```
//!
//! ## Formats
//!
//! ```text
//! square        1080x1080
//! portrait      1080x1920
//! square-hd     2160x2160
//! portrait-hd   2160x3840
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.

use crate::compose::{FitOutcome, PhotoReport, ShareFormat};
use crate::render::RenderedImage;
use serde::Serialize;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn photo_line(report: &PhotoReport) -> String {
    let drawn = report.drawn.len();
    if report.skipped.is_empty() {
        return format!("Photos: {drawn} drawn");
    }
    // 1-based for humans
    let skipped: Vec<String> = report
        .skipped
        .iter()
        .map(|i| format!("#{}", i + 1))
        .collect();
    format!(
        "Photos: {drawn} drawn, {} skipped ({})",
        report.skipped.len(),
        skipped.join(", ")
    )
}

fn text_line(outcome: FitOutcome) -> String {
    match outcome {
        FitOutcome::Fitted { shrink_steps: 0 } => "Text: fitted at full size".to_string(),
        FitOutcome::Fitted { shrink_steps } => {
            format!("Text: fitted after {}", plural(shrink_steps, "shrink step"))
        }
        FitOutcome::Truncated { shrink_steps } => {
            format!("Text: truncated after {}", plural(shrink_steps, "shrink step"))
        }
    }
}

/// Summary of a finished render.
pub fn format_render_summary(format: ShareFormat, image: &RenderedImage, path: &Path) -> Vec<String> {
    vec![
        format!(
            "Rendered {format} {}x{} {} → {}",
            image.width,
            image.height,
            image.encoding,
            path.display()
        ),
        format!("{}{}", indent(1), photo_line(&image.photo_report)),
        format!("{}{}", indent(1), text_line(image.text_outcome)),
    ]
}

pub fn print_render_summary(format: ShareFormat, image: &RenderedImage, path: &Path) {
    for line in format_render_summary(format, image, path) {
        println!("{line}");
    }
}

/// Machine-readable form of [`format_render_summary`].
#[derive(Debug, Serialize)]
pub struct RenderSummary {
    pub format: ShareFormat,
    pub width: u32,
    pub height: u32,
    pub encoding: String,
    pub path: String,
    pub bytes: usize,
    pub photos_drawn: usize,
    pub photos_skipped: Vec<usize>,
    pub truncated: bool,
    pub shrink_steps: usize,
}

impl RenderSummary {
    pub fn new(format: ShareFormat, image: &RenderedImage, path: &Path) -> Self {
        Self {
            format,
            width: image.width,
            height: image.height,
            encoding: image.encoding.to_string(),
            path: path.display().to_string(),
            bytes: image.bytes.len(),
            photos_drawn: image.photo_report.drawn.len(),
            photos_skipped: image.photo_report.skipped.clone(),
            truncated: matches!(image.text_outcome, FitOutcome::Truncated { .. }),
            shrink_steps: image.text_outcome.shrink_steps(),
        }
    }
}

/// Every format with its pixel size, slugs padded to a column.
pub fn format_formats_table() -> Vec<String> {
    let width = ShareFormat::ALL
        .iter()
        .map(|f| f.slug().len())
        .max()
        .unwrap_or(0);
    ShareFormat::ALL
        .iter()
        .map(|f| {
            format!(
                "{:<pad$}{}x{}",
                f.slug(),
                f.width(),
                f.height(),
                pad = width + 3
            )
        })
        .collect()
}

pub fn print_formats_table() {
    for line in format_formats_table() {
        println!("{line}");
    }
}
