//! Whole-document composition
//!
//! Rebuilds file text from a parsed document and the (possibly edited) lines:
//! residues go back into their gaps, lines keep the on-disk order, and any line
//! equal to what was parsed is written from its original group text, so an
//! unedited document comes back byte for byte.

use super::serializer::serialize_line;
use crate::error::{DryError, InvariantViolation, PreconditionError};
use crate::model::{Designation, Line, LinesAndResidues, ResidueLocation, ResidueMap};
use crate::parsing::{AFTER_LINE, BEFORE_LINE};
use std::collections::HashMap;

/// Compose the file text. Designations missing from `lines_by_designation` keep
/// their parsed content; designations that were never parsed are rejected since
/// they have no position in the file.
pub fn compose_document(
    document: &LinesAndResidues,
    lines_by_designation: &HashMap<Designation, Line>,
) -> Result<String, DryError> {
    let group_count = document.lines.len();
    check_residue_locations(&document.residues, group_count)?;

    if let Some(unknown) = lines_by_designation
        .keys()
        .find(|designation| document.find(designation.as_str()).is_none())
    {
        return Err(PreconditionError::UnknownDesignation(unknown.to_string()).into());
    }

    let mut out = String::new();
    out.push_str(document.residues.get(ResidueLocation::before(0)));

    for (index, parsed) in document.lines.iter().enumerate() {
        let line = lines_by_designation
            .get(parsed.line.designation())
            .unwrap_or(&parsed.line);

        if line == &parsed.line {
            out.push_str(BEFORE_LINE);
            out.push_str(&parsed.source);
            if parsed.closed {
                out.push_str(AFTER_LINE);
            }
        } else {
            tracing::debug!(designation = %line.designation(), "re-serializing edited line");
            out.push_str(&serialize_line(line));
        }

        out.push_str(document.residues.get(ResidueLocation::after(index)));
    }

    Ok(out)
}

/// The unedited document, exactly as read.
pub fn compose_unchanged(document: &LinesAndResidues) -> Result<String, DryError> {
    compose_document(document, &HashMap::new())
}

/// Freshly built lines (no source text to reuse) with residues interleaved by
/// position, e.g. the result of a merge.
pub fn compose_lines(lines: &[Line], residues: &ResidueMap) -> Result<String, DryError> {
    check_residue_locations(residues, lines.len())?;
    let mut out = String::from(residues.get(ResidueLocation::before(0)));
    for (index, line) in lines.iter().enumerate() {
        out.push_str(&serialize_line(line));
        out.push_str(residues.get(ResidueLocation::after(index)));
    }
    Ok(out)
}

/// Every residue key must be one of the `group_count + 1` gaps.
fn check_residue_locations(
    residues: &ResidueMap,
    group_count: usize,
) -> Result<(), InvariantViolation> {
    match residues
        .locations()
        .find(|location| location.slot() > group_count)
    {
        Some(location) => Err(InvariantViolation::UnaccountedResidue {
            location,
            groups: group_count,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LabelTable, Row};
    use crate::parsing::{parse_document, ParseOptions};

    fn sample() -> String {
        format!(
            "intro\n{BEFORE_LINE}\nN: A 1\nBaseline:   kati anu\nGloss: dog run\n{AFTER_LINE}\n\n% aside\n{BEFORE_LINE}\nN: A 2\nTranslation: it runs\n{AFTER_LINE}\n"
        )
    }

    #[test]
    fn test_unchanged_is_byte_identical() {
        let text = sample();
        let document = parse_document(&text, ParseOptions::default()).unwrap();
        assert_eq!(compose_unchanged(&document).unwrap(), text);
    }

    #[test]
    fn test_edited_line_is_reserialized_in_place() {
        let text = sample();
        let document = parse_document(&text, ParseOptions::default()).unwrap();
        let mut lines = document.lines_by_designation();

        let mut labels = LabelTable::new();
        let translation = labels.resolve("Translation").unwrap();
        let edited = lines[&Designation::from("A 1")]
            .with_row(Row::with_text(translation, "the dog runs").unwrap())
            .unwrap();
        lines.insert(edited.designation().clone(), edited);

        let out = compose_document(&document, &lines).unwrap();
        let expected = format!(
            "intro\n{BEFORE_LINE}\nN: A 1\nBaseline: kati anu\nGloss: dog run\nTranslation: the dog runs\n{AFTER_LINE}\n\n% aside\n{BEFORE_LINE}\nN: A 2\nTranslation: it runs\n{AFTER_LINE}\n"
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_partial_map_keeps_parsed_lines() {
        let text = sample();
        let document = parse_document(&text, ParseOptions::default()).unwrap();
        let mut lines = document.lines_by_designation();
        lines.remove(&Designation::from("A 2"));
        assert_eq!(compose_document(&document, &lines).unwrap(), text);
    }

    #[test]
    fn test_unknown_designation_is_rejected() {
        let document = parse_document(&sample(), ParseOptions::default()).unwrap();
        let mut lines = document.lines_by_designation();
        let stray = lines[&Designation::from("A 2")].redesignated("B 9").unwrap();
        lines.insert(stray.designation().clone(), stray);
        let err = compose_document(&document, &lines).unwrap_err();
        assert!(matches!(
            err,
            DryError::Precondition(PreconditionError::UnknownDesignation(_))
        ));
    }

    #[test]
    fn test_residue_outside_gaps_is_internal() {
        let mut document = parse_document(&sample(), ParseOptions::default()).unwrap();
        document
            .residues
            .insert(ResidueLocation::after(7), "lost");
        let err = compose_unchanged(&document).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_compose_lines_normalizes_groups() {
        let document = parse_document(&sample(), ParseOptions::default()).unwrap();
        let lines: Vec<Line> = document.iter_lines().cloned().collect();
        let out = compose_lines(&lines, &document.residues).unwrap();
        assert!(out.starts_with(&format!("intro\n{BEFORE_LINE}\nN: A 1\nBaseline: kati anu\n")));
        assert!(out.ends_with(&format!("Translation: it runs\n{AFTER_LINE}\n")));
    }

    #[test]
    fn test_unterminated_group_round_trips() {
        let text = format!("{BEFORE_LINE}\nN: A 1\nBaseline: x\n");
        let document = parse_document(&text, ParseOptions::default()).unwrap();
        assert_eq!(compose_unchanged(&document).unwrap(), text);
    }
}
