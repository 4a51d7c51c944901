//! Greedy line breaking and ellipsis truncation.
//!
//! Explicit newlines are hard breaks and blank lines survive as empty
//! lines. Words are packed greedily; a word wider than the whole line (long
//! URLs, or scripts written without spaces) is broken between characters so
//! no line ever exceeds `max_width` unless a single character does.

use super::typeface::Typeface;

pub const ELLIPSIS: char = '…';

/// Break `text` into lines no wider than `max_width` at `size`.
pub fn wrap_text(face: &dyn Typeface, text: &str, size: f32, max_width: f32) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        wrap_paragraph(face, paragraph, size, max_width, &mut lines);
    }
    lines
}

fn wrap_paragraph(
    face: &dyn Typeface,
    paragraph: &str,
    size: f32,
    max_width: f32,
    lines: &mut Vec<String>,
) {
    let fits = |s: &str| face.text_width(s, size) <= max_width;
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_string();
            continue;
        }

        // Word wider than a line: break between characters
        for ch in word.chars() {
            let mut next = current.clone();
            next.push(ch);
            if current.is_empty() || fits(&next) {
                current = next;
            } else {
                lines.push(std::mem::replace(&mut current, ch.to_string()));
            }
        }
    }

    // A blank paragraph still occupies a line
    lines.push(current);
}

/// Shorten `line` until it plus a trailing ellipsis fits `max_width`.
///
/// Whole words are dropped first; a line without spaces loses characters.
pub fn ellipsize(face: &dyn Typeface, line: &str, size: f32, max_width: f32) -> String {
    let mut kept = line.trim_end().to_string();
    loop {
        let candidate = format!("{kept}{ELLIPSIS}");
        if kept.is_empty() || face.text_width(&candidate, size) <= max_width {
            return candidate;
        }
        match kept.rsplit_once(char::is_whitespace) {
            Some((head, _)) => kept = head.trim_end().to_string(),
            None => {
                kept.pop();
            }
        }
    }
}

/// Keep at most `max_lines`; when lines were dropped the last kept line
/// ends with an ellipsis.
pub fn truncate_lines(
    face: &dyn Typeface,
    mut lines: Vec<String>,
    max_lines: usize,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        *last = ellipsize(face, last, size, max_width);
    }
    lines
}
