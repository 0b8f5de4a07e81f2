//! Test helpers
//!
//! Factories for building model values from .dry snippets, and line-based text
//! assertions for serializer and renderer output. Used by the unit tests in this
//! crate and by the integration tests under `tests/`.

pub mod text_diff;

pub use text_diff::{assert_text_eq, diff_text};

use crate::model::{LabelTable, Line};
use crate::parsing::{LineBuilder, AFTER_LINE, BEFORE_LINE};

/// Build a line from the rows of one group, e.g. `"N: A 1\nBaseline: kati anu"`.
///
/// # Panics
///
/// If the body does not parse.
pub fn line_from_body(body: &str) -> Line {
    let mut labels = LabelTable::new();
    match LineBuilder::new(&mut labels).build(body) {
        Ok(line) => line,
        Err(e) => panic!("test line does not parse: {e}\n{body}"),
    }
}

/// Wrap each body in group delimiters, one group per line of output.
pub fn dry_text(bodies: &[&str]) -> String {
    bodies
        .iter()
        .map(|body| format!("{BEFORE_LINE}\n{body}\n{AFTER_LINE}\n"))
        .collect()
}

/// A small two-line text with residue before, between and after the groups.
pub fn sample_text() -> String {
    format!(
        "% Kaikai, recorded 2019\n{}\n% second half\n{}% end\n",
        dry_text(&["N: Kaikai 1\nBaseline: kati anu\nParse: kat-i anu\nGloss: dog-NOM run\nTranslation: the dog runs"]).trim_end(),
        dry_text(&["N: Kaikai 2\nBaseline: anu\nTranslation: it runs"]),
    )
}
