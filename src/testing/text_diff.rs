//! Line-based text comparison for tests
//!
//! Serialized .dry text is mostly whitespace-sensitive boilerplate, so a plain
//! `assert_eq!` on two long strings hides where they differ. These helpers
//! report the differing lines with their numbers instead.

/// Panics with a per-line diff if `expected != actual`.
pub fn assert_text_eq(expected: &str, actual: &str) {
    if let Some(report) = diff_text(expected, actual) {
        panic!("\n\nText comparison failed:\n{report}\n");
    }
}

/// `None` if the strings are equal, otherwise a report of the differing lines.
///
/// Lines are split on `\n` only, so a difference in trailing newlines or `\r`
/// shows up as its own line.
pub fn diff_text(expected: &str, actual: &str) -> Option<String> {
    if expected == actual {
        return None;
    }

    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let actual_lines: Vec<&str> = actual.split('\n').collect();
    let max_lines = expected_lines.len().max(actual_lines.len());

    let mut diff_lines = Vec::new();
    for i in 0..max_lines {
        match (expected_lines.get(i), actual_lines.get(i)) {
            (Some(exp), Some(act)) if exp == act => {}
            (Some(exp), Some(act)) => {
                diff_lines.push(format!("Line {}: MISMATCH", i + 1));
                diff_lines.push(format!("  Expected: {exp:?}"));
                diff_lines.push(format!("  Actual:   {act:?}"));
            }
            (Some(exp), None) => {
                diff_lines.push(format!("Line {}: MISSING in actual", i + 1));
                diff_lines.push(format!("  Expected: {exp:?}"));
            }
            (None, Some(act)) => {
                diff_lines.push(format!("Line {}: EXTRA in actual", i + 1));
                diff_lines.push(format!("  Actual:   {act:?}"));
            }
            (None, None) => {}
        }
    }

    Some(format!(
        "{}\n\nExpected ({} lines):\n{expected}\n\nActual ({} lines):\n{actual}",
        diff_lines.join("\n"),
        expected_lines.len(),
        actual_lines.len(),
    ))
}
