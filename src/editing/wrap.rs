//! Wrapping plain text into line groups: one line per input line, all under one
//! unaligned label, designated `1..n` (optionally prefixed with a text name).

use crate::error::{DryError, PreconditionError};
use crate::model::{Designation, LabelTable, Line, Row, RowLabel};

pub fn wrap_text(text: &str, label: &str, text_name: Option<&str>) -> Result<Vec<Line>, DryError> {
    let label = RowLabel::new(label, false).map_err(|invalid| PreconditionError::InvalidLabel {
        label: invalid.label,
        reason: invalid.reason,
    })?;
    let mut labels = LabelTable::new();
    let label = labels.intern(label)?;

    text.lines()
        .enumerate()
        .map(|(i, raw)| -> Result<Line, DryError> {
            let line_name = (i + 1).to_string();
            let designation = match text_name {
                Some(text_name) => Designation::from_parts(text_name, &line_name),
                None => Designation::new(line_name),
            };
            let row = Row::with_text(label.clone(), raw.trim())?;
            Line::new(designation, vec![row])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::serialize_lines;
    use crate::parsing::{parse_document, ParseOptions};

    #[test]
    fn test_one_line_per_input_line() {
        let lines = wrap_text("kati anu\nanu kati\n", "Baseline", Some("Kaikai")).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].designation().as_str(), "Kaikai 2");
        let row = lines[0].get_by_name("Baseline").unwrap();
        assert!(!row.is_aligned());
        assert_eq!(row.content(), "kati anu");
    }

    #[test]
    fn test_wrapped_output_parses() {
        let lines = wrap_text("one\ntwo", "Production", None).unwrap();
        let text = serialize_lines(&lines);
        let document = parse_document(&text, ParseOptions::default()).unwrap();
        let designations: Vec<&str> = document
            .iter_lines()
            .map(|line| line.designation().as_str())
            .collect();
        assert_eq!(designations, vec!["1", "2"]);
    }

    #[test]
    fn test_invalid_label() {
        assert!(wrap_text("x", "Free translation", None).is_err());
    }
}
