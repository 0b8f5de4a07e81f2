//! Line serialization
//!
//! The exact left inverse of [`LineBuilder`](crate::parsing::LineBuilder): parsing
//! the output of [`serialize_line`] yields an equal line (cell whitespace is the
//! only thing not preserved, since cells are stripped on read).
//!
//! ```text
//! ┌------------┐
//! N: <designation>
//! <label>: <cell> <cell> ...
//! └------------┘
//! ```

use crate::model::{Line, Row, RowLabel};
use crate::parsing::{AFTER_LINE, BEFORE_LINE};

/// `label: content` for one row.
pub fn row_to_string(row: &Row) -> String {
    labeled(row.label().name(), &row.content())
}

pub fn designation_row_to_string(line: &Line) -> String {
    labeled(RowLabel::DESIGNATION, line.designation().as_str())
}

/// The text between BEFORE and AFTER for `line`.
pub fn line_body(line: &Line) -> String {
    let mut body = String::from("\n");
    body.push_str(&designation_row_to_string(line));
    body.push('\n');
    for row in line {
        body.push_str(&row_to_string(row));
        body.push('\n');
    }
    body
}

/// A complete line group, delimiters included.
pub fn serialize_line(line: &Line) -> String {
    format!("{BEFORE_LINE}{}{AFTER_LINE}", line_body(line))
}

/// Line groups one per block, no residue. Used when there is no source file to
/// preserve (wrapped input, merge output on stdout).
pub fn serialize_lines<'a>(lines: impl IntoIterator<Item = &'a Line>) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&serialize_line(line));
        out.push('\n');
    }
    out
}

fn labeled(label: &str, content: &str) -> String {
    format!("{label}{} {content}", RowLabel::SEPARATOR)
}
