//! Display width of cell text in terminal columns.
//!
//! Combining marks (e.g. the acute in `e\u{301}`) occupy no column of their own,
//! so every layout computation goes through [`display_width`] rather than a
//! character count.

use unicode_width::UnicodeWidthChar;

/// Width of one codepoint: `0` for combining marks and control characters.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// `text` followed by enough spaces to fill `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    let mut padded = String::with_capacity(text.len() + fill);
    padded.push_str(text);
    padded.extend(std::iter::repeat(' ').take(fill));
    padded
}
