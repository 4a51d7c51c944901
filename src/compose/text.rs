//! Text compositor: shrink-to-fit layout of date, title and content, plus
//! the branding stamp.
//!
//! Layout and painting are separate steps. [`fit_text`] is pure: it wraps,
//! measures and places every line, returning a [`TextLayout`] whose line
//! boxes all lie inside the content area. [`paint_text`] rasterises that
//! layout.
//!
//! ## Fitting
//!
//! Starting from [`text_sizes`], the block heights are measured against the
//! area. While they overflow, one parameter shrinks per step, in this fixed
//! order:
//!
//! 1. content size, down to `22 × scale`
//! 2. title size, down to `36 × scale`
//! 3. content line height, from 1.6 down to 1.4
//!
//! The loop stops after [`MAX_FIT_ITERATIONS`] steps or when nothing is left
//! to shrink. If the text still overflows, the layout falls back to
//! truncation: the title keeps at most its line cap, the content keeps the
//! lines that fit, and each cut block ends with an ellipsis.

use super::canvas::Canvas;
use super::format::ShareFormat;
use super::geometry::{BRAND_MARGIN, Rect, brand_font_size, scale_factor, spacing, text_sizes};
use super::params::Spacing;
use super::typeface::{FaceSet, Typeface};
use super::wrap::{ellipsize, truncate_lines, wrap_text};
use crate::types::DiaryEntry;
use image::Rgba;
use log::debug;

pub const BRAND_TEXT: &str = "Made with Photo Diary";

pub const MAX_FIT_ITERATIONS: usize = 24;
const INITIAL_LINE_HEIGHT: f32 = 1.6;
const MIN_LINE_HEIGHT: f32 = 1.4;
const LINE_HEIGHT_STEP: f32 = 0.05;
const CONTENT_FLOOR: f32 = 22.0;
const TITLE_FLOOR: f32 = 36.0;
const SIZE_STEP: f32 = 2.0;
const DATE_LINE_HEIGHT: f32 = 1.2;
const TITLE_LINE_HEIGHT: f32 = 1.25;
const BRAND_LINE_HEIGHT: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Date,
    Title,
    Content,
    Brand,
}

/// One line of text with its box in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub role: TextRole,
    pub text: String,
    pub size: f32,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// Everything fits after `shrink_steps` reductions.
    Fitted { shrink_steps: usize },
    /// The fallback truncated the title and/or content.
    Truncated { shrink_steps: usize },
}

impl FitOutcome {
    pub fn shrink_steps(self) -> usize {
        match self {
            Self::Fitted { shrink_steps } | Self::Truncated { shrink_steps } => shrink_steps,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextLayout {
    pub area: Rect,
    pub lines: Vec<PlacedLine>,
    pub outcome: FitOutcome,
    pub title_size: f32,
    pub content_size: f32,
    pub line_height: f32,
}

impl TextLayout {
    pub fn lines_with_role(&self, role: TextRole) -> impl Iterator<Item = &PlacedLine> {
        self.lines.iter().filter(move |l| l.role == role)
    }
}

/// Colors for each text role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: Rgba<u8>,
    pub date: Rgba<u8>,
    pub brand: Rgba<u8>,
}

/// Sizes that shrink while fitting.
#[derive(Debug, Clone, Copy)]
struct FitState {
    date_size: f32,
    title_size: f32,
    content_size: f32,
    line_height: f32,
}

struct ShrinkLimits {
    step: f32,
    content_floor: f32,
    title_floor: f32,
}

impl FitState {
    /// Apply one reduction in priority order. Returns `false` when every
    /// parameter is already at its floor.
    fn shrink(&mut self, limits: &ShrinkLimits) -> bool {
        if self.content_size > limits.content_floor {
            self.content_size = (self.content_size - limits.step).max(limits.content_floor);
        } else if self.title_size > limits.title_floor {
            self.title_size = (self.title_size - limits.step).max(limits.title_floor);
        } else if self.line_height > MIN_LINE_HEIGHT {
            let next = self.line_height - LINE_HEIGHT_STEP;
            // Snap so float drift cannot leave a sliver above the floor
            self.line_height = if next <= MIN_LINE_HEIGHT + 1e-3 {
                MIN_LINE_HEIGHT
            } else {
                next
            };
        } else {
            return false;
        }
        true
    }

    fn date_box(&self) -> f32 {
        self.date_size * DATE_LINE_HEIGHT
    }

    fn title_box(&self) -> f32 {
        self.title_size * TITLE_LINE_HEIGHT
    }

    fn content_box(&self) -> f32 {
        self.content_size * self.line_height
    }
}

/// Wrapped lines at one [`FitState`].
struct Measured {
    date: Vec<String>,
    title: Vec<String>,
    content: Vec<String>,
}

impl Measured {
    fn height(&self, state: &FitState, gaps: &Spacing) -> f32 {
        let blocks = [
            (self.date.len(), state.date_box()),
            (self.title.len(), state.title_box()),
            (self.content.len(), state.content_box()),
        ];
        let mut height = 0.0;
        let mut placed_any = false;
        for (idx, (count, line_box)) in blocks.into_iter().enumerate() {
            if count == 0 {
                continue;
            }
            if placed_any {
                height += self.gap_before(idx, gaps);
            }
            height += count as f32 * line_box;
            placed_any = true;
        }
        height
    }

    /// Gap above block `idx` (0 = date, 1 = title, 2 = content).
    fn gap_before(&self, idx: usize, gaps: &Spacing) -> f32 {
        match idx {
            2 if !self.title.is_empty() => gaps.after_title as f32,
            _ => gaps.after_date as f32,
        }
    }
}

fn measure(
    diary: &DiaryEntry,
    date_label: &str,
    title_max_lines: usize,
    state: &FitState,
    width: f32,
    faces: FaceSet<'_>,
) -> Measured {
    let date_label = date_label.trim();
    let date = if date_label.is_empty() {
        Vec::new()
    } else if faces.body.text_width(date_label, state.date_size) <= width {
        vec![date_label.to_string()]
    } else {
        vec![ellipsize(faces.body, date_label, state.date_size, width)]
    };

    let title = truncate_lines(
        faces.heading,
        wrap_text(faces.heading, &diary.title, state.title_size, width),
        title_max_lines,
        state.title_size,
        width,
    );
    let content = wrap_text(faces.body, &diary.content, state.content_size, width);

    Measured {
        date,
        title,
        content,
    }
}

/// Lay out date, title and content inside `area`, shrinking until they fit
/// and truncating when shrinking is not enough.
///
/// Never fails and never places a line outside `area`, whatever the text
/// length.
pub fn fit_text(
    diary: &DiaryEntry,
    date_label: &str,
    format: ShareFormat,
    area: Rect,
    faces: FaceSet<'_>,
) -> TextLayout {
    let sizes = text_sizes(format, diary);
    let gaps = spacing(format);
    let scale = scale_factor(format);
    let limits = ShrinkLimits {
        step: (SIZE_STEP * scale).round().max(1.0),
        content_floor: (CONTENT_FLOOR * scale).round(),
        title_floor: (TITLE_FLOOR * scale).round(),
    };
    let mut state = FitState {
        date_size: sizes.date_size as f32,
        title_size: sizes.title_size as f32,
        content_size: sizes.content_size as f32,
        line_height: INITIAL_LINE_HEIGHT,
    };

    let mut shrink_steps = 0;
    let (measured, fits) = loop {
        let measured = measure(diary, date_label, sizes.title_max_lines, &state, area.width, faces);
        let fits = measured.height(&state, &gaps) <= area.height;
        if fits || shrink_steps >= MAX_FIT_ITERATIONS || !state.shrink(&limits) {
            break (measured, fits);
        }
        shrink_steps += 1;
    };

    let outcome = if fits {
        FitOutcome::Fitted { shrink_steps }
    } else {
        debug!(
            "text overflow after {shrink_steps} steps (title {}px, content {}px, line height {:.2}); truncating",
            state.title_size, state.content_size, state.line_height
        );
        FitOutcome::Truncated { shrink_steps }
    };

    TextLayout {
        area,
        lines: place_lines(measured, &state, &gaps, area, faces),
        outcome,
        title_size: state.title_size,
        content_size: state.content_size,
        line_height: state.line_height,
    }
}

/// Stack the measured blocks top to bottom, keeping only the lines whose
/// boxes end inside `area`. A block that loses lines ends with an ellipsis.
fn place_lines(
    measured: Measured,
    state: &FitState,
    gaps: &Spacing,
    area: Rect,
    faces: FaceSet<'_>,
) -> Vec<PlacedLine> {
    let gap_title = measured.gap_before(1, gaps);
    let gap_content = measured.gap_before(2, gaps);
    let blocks = [
        (TextRole::Date, measured.date, state.date_size, state.date_box(), 0.0, faces.body),
        (TextRole::Title, measured.title, state.title_size, state.title_box(), gap_title, faces.heading),
        (TextRole::Content, measured.content, state.content_size, state.content_box(), gap_content, faces.body),
    ];

    let bottom = area.bottom();
    let mut y = area.top;
    let mut placed = Vec::new();

    for (role, lines, size, line_box, gap, face) in blocks {
        if lines.is_empty() {
            continue;
        }
        let gap = if placed.is_empty() { 0.0 } else { gap };
        let room = bottom - y - gap;
        let fit_count = if room <= 0.0 {
            0
        } else {
            ((room + 1e-3) / line_box).floor() as usize
        };
        let lines = truncate_lines(face, lines, fit_count, size, area.width);
        if lines.is_empty() {
            continue;
        }

        let block_top = y + gap;
        let count = lines.len();
        for (i, text) in lines.into_iter().enumerate() {
            let width = face.text_width(&text, size).min(area.width);
            placed.push(PlacedLine {
                role,
                text,
                size,
                rect: Rect::new(area.left, block_top + i as f32 * line_box, width, line_box),
            });
        }
        y = block_top + count as f32 * line_box;
    }

    placed
}

/// Rasterise a [`TextLayout`]. Glyph coverage is clipped to the layout area.
pub fn paint_text(canvas: &mut Canvas, layout: &TextLayout, faces: FaceSet<'_>, palette: &Palette) {
    for line in &layout.lines {
        let (face, color) = match line.role {
            TextRole::Date => (faces.body, palette.date),
            TextRole::Title => (faces.heading, palette.text),
            TextRole::Content => (faces.body, palette.text),
            TextRole::Brand => (faces.heading, palette.brand),
        };
        draw_placed(canvas, face, line, color, &layout.area);
    }
}

fn draw_placed(canvas: &mut Canvas, face: &dyn Typeface, line: &PlacedLine, color: Rgba<u8>, clip: &Rect) {
    if line.text.is_empty() {
        return;
    }
    let (ascent, descent) = face.v_metrics(line.size);
    let baseline = line.rect.top + (line.rect.height - (ascent - descent)) / 2.0 + ascent;
    face.draw_line(canvas, &line.text, line.size, line.rect.left, baseline, color, clip);
}

/// Where the branding stamp goes: right-aligned in the bottom-right corner
/// of `area`, inset by the scaled margin.
pub fn brand_line(format: ShareFormat, area: Rect, face: &dyn Typeface) -> PlacedLine {
    let size = brand_font_size(format) as f32;
    let margin = (BRAND_MARGIN * scale_factor(format)).round();
    let width = face.text_width(BRAND_TEXT, size).min((area.width - 2.0 * margin).max(0.0));
    let height = size * BRAND_LINE_HEIGHT;
    PlacedLine {
        role: TextRole::Brand,
        text: BRAND_TEXT.to_string(),
        size,
        rect: Rect::new(
            area.right() - margin - width,
            area.bottom() - margin - height,
            width,
            height,
        ),
    }
}

/// Paint the branding stamp into `area` and return its box.
pub fn draw_branding(
    canvas: &mut Canvas,
    format: ShareFormat,
    area: Rect,
    face: &dyn Typeface,
    color: Rgba<u8>,
) -> Rect {
    let line = brand_line(format, area, face);
    draw_placed(canvas, face, &line, color, &area);
    line.rect
}
