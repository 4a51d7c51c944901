//! # Diary Share
//!
//! Renders a photo diary entry (date, title, free text and up to three
//! photos) into a single share image sized for social platforms.
//!
//! # Architecture: One Sequential Pass
//!
//! ```text
//! format → split → photos → text fit → paint → branding → encode
//! ```
//!
//! [`render::render_share_image`] runs the whole pass. Every geometric
//! decision lives in pure functions in [`compose::geometry`], so layout is
//! unit-testable without touching pixels. Collaborators that belong to the
//! host app (photo storage, logging, date formatting, fonts) are injected
//! through [`render::RenderEnv`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compose`] | Format geometry, photo compositor, text compositor, canvas and typefaces |
//! | [`render`] | The pipeline entry point, `ShareError`, and output encoding |
//! | [`config`] | `share.toml` loading, validation, and merging over stock defaults |
//! | [`types`] | `DiaryEntry` and the `PhotoHandle` capability |
//! | [`photo`] | File-backed and in-memory photo handles; Display P3 → sRGB |
//! | [`dates`] | Locale-aware short date labels |
//! | [`logger`] | The injected `ShareLogger` sink and its `log` facade default |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Shrink Before Truncating
//!
//! Diary entries range from a single line to thousands of words. Text is
//! first shrunk in a fixed order (content size, then title size, then line
//! height) within floors that keep it legible, and only then cut with an
//! ellipsis. The loop is bounded so pathological input cannot stall a render.
//!
//! ## Photos Never Fail a Render
//!
//! A photo that cannot be fetched or decoded leaves its cell empty and is
//! reported through the logger. Users still get an image of their entry.
//!
//! ## Embedded Fonts
//!
//! DejaVu Sans (regular and bold) is compiled into the binary, so output is
//! identical on every machine. `[fonts]` in `share.toml` swaps in other
//! faces, for example for scripts DejaVu does not cover.

pub mod compose;
pub mod config;
pub mod dates;
pub mod logger;
pub mod output;
pub mod photo;
pub mod render;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
