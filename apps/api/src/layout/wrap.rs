//! Greedy word wrap to a fixed width in points.

use crate::layout::font_metrics::Face;

/// Wraps `text` into lines no wider than `max_width` points at `size` pt.
///
/// Explicit newlines start a new line. Words are separated by a single space on
/// output. A word wider than `max_width` on its own is broken between
/// characters. Empty or whitespace-only text yields one empty line so every
/// field still occupies a row.
pub fn wrap_text(text: &str, face: Face<'_>, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if face.text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if face.text_width(word, size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, face, size, max_width);
                // The last piece stays open so following words can join it.
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Splits an over-long word into chunks that each fit `max_width`.
/// Every chunk holds at least one character.
fn break_word(word: &str, face: Face<'_>, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in word.chars() {
        current.push(c);
        if current.chars().count() > 1 && face.text_width(&current, size) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
