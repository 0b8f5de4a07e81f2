//! Combining rows from two files with the same lines.
//!
//! Each file gets a selection naming which of its rows go into the output:
//!
//! ```text
//! Baseline:BaselineRaw                   take Baseline, write it as BaselineRaw
//! Baseline:BaselineRaw/BaselineToClean   copy Baseline under two labels
//! Parse,Gloss,Translation                take these rows as they are
//! *                                      every row the other selection does not produce
//! residues                               keep this file's residues (default: first file)
//! ```
//!
//! Both files must hold exactly the same designations. The output follows the
//! first file's line order.

use super::relabel::check_target_alignment;
use crate::error::{DryError, PreconditionError};
use crate::formats::compose_lines;
use crate::model::line::validate_row_lengths;
use crate::model::{Designation, LabelTable, Line, LinesAndResidues, ResidueMap, Row, RowLabel};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeItem {
    pub label: String,
    /// Output labels; the input label itself when none were given.
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSpec {
    pub items: Vec<MergeItem>,
    pub all_other_rows: bool,
    pub keep_residues: bool,
}

impl MergeSpec {
    pub fn parse(text: &str) -> Result<Self, PreconditionError> {
        let invalid = || PreconditionError::InvalidMergeSpec(text.to_string());
        let mut spec = MergeSpec::default();
        let mut seen = HashSet::new();

        for item in text.split(',').map(str::trim) {
            if item == RowLabel::ALL_OTHER_ROWS.to_string() {
                spec.all_other_rows = true;
                continue;
            }
            if item == RowLabel::RESIDUES_PSEUDO_LABEL {
                spec.keep_residues = true;
                continue;
            }
            let (label, outputs) = match item.split_once(RowLabel::SEPARATOR) {
                Some((label, outputs)) => (
                    label.trim(),
                    outputs
                        .split(RowLabel::MULTIPLE_ROWS_SEPARATOR)
                        .map(|output| output.trim().to_string())
                        .collect::<Vec<_>>(),
                ),
                None => (item, vec![item.to_string()]),
            };
            for name in std::iter::once(label).chain(outputs.iter().map(String::as_str)) {
                RowLabel::new(name, false).map_err(|_| invalid())?;
            }
            if !seen.insert(label.to_string()) {
                return Err(invalid());
            }
            spec.items.push(MergeItem {
                label: label.to_string(),
                outputs,
            });
        }
        Ok(spec)
    }

    fn explicit_inputs(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.label.as_str())
    }

    fn explicit_outputs(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .flat_map(|item| item.outputs.iter().map(String::as_str))
    }

    fn item(&self, label: &str) -> Option<&MergeItem> {
        self.items.iter().find(|item| item.label == label)
    }
}

/// The merged lines, in the first file's order, with the chosen residues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedDocument {
    pub lines: Vec<Line>,
    pub residues: ResidueMap,
}

impl MergedDocument {
    pub fn to_text(&self) -> Result<String, DryError> {
        compose_lines(&self.lines, &self.residues)
    }
}

pub fn merge(
    first: &LinesAndResidues,
    first_spec: &MergeSpec,
    second: &LinesAndResidues,
    second_spec: &MergeSpec,
) -> Result<MergedDocument, DryError> {
    check_specs(first_spec, second_spec)?;
    check_designations(first, second)?;
    check_labels_present(first, first_spec)?;
    check_labels_present(second, second_spec)?;

    let second_lines = second.lines_by_designation();
    let mut labels = LabelTable::new();
    let mut lines = Vec::with_capacity(first.len());

    for line in first.iter_lines() {
        let other = &second_lines[line.designation()];
        let mut rows = select_rows(line, first_spec, second_spec, &mut labels)?;
        rows.extend(select_rows(other, second_spec, first_spec, &mut labels)?);

        validate_row_lengths(&rows).map_err(|_| PreconditionError::MergedRowLengths {
            designation: line.designation().to_string(),
            lengths: rows.iter().map(Row::len).collect(),
        })?;
        lines.push(Line::new(line.designation().clone(), rows)?);
    }

    let residues = if second_spec.keep_residues {
        second.residues.clone()
    } else {
        first.residues.clone()
    };

    tracing::debug!(lines = lines.len(), "merged files");
    Ok(MergedDocument { lines, residues })
}

/// Rows taken from `line` under `spec`; `other` decides what `*` leaves out.
fn select_rows(
    line: &Line,
    spec: &MergeSpec,
    other: &MergeSpec,
    labels: &mut LabelTable,
) -> Result<Vec<Row>, DryError> {
    let claimed: HashSet<&str> = other
        .explicit_outputs()
        .chain(spec.explicit_outputs())
        .collect();

    let mut rows = Vec::new();
    for row in line {
        let name = row.label().name();
        match spec.item(name) {
            Some(item) => {
                for output in &item.outputs {
                    check_target_alignment(row.label(), output)?;
                    let label = row
                        .label()
                        .relabel(output.as_str())
                        .map_err(|invalid| PreconditionError::InvalidMergeSpec(invalid.to_string()))?;
                    rows.push(row.relabeled(labels.intern(label)?)?);
                }
            }
            None if spec.all_other_rows && !claimed.contains(name) => rows.push(row.clone()),
            None => {}
        }
    }
    Ok(rows)
}

fn check_specs(first: &MergeSpec, second: &MergeSpec) -> Result<(), PreconditionError> {
    if first.all_other_rows && second.all_other_rows {
        return Err(PreconditionError::MergeConflict(
            RowLabel::ALL_OTHER_ROWS.to_string(),
        ));
    }
    if first.keep_residues && second.keep_residues {
        return Err(PreconditionError::MergeConflict(
            RowLabel::RESIDUES_PSEUDO_LABEL.to_string(),
        ));
    }
    let mut outputs = HashSet::new();
    for output in first.explicit_outputs().chain(second.explicit_outputs()) {
        if !outputs.insert(output) {
            return Err(PreconditionError::MergeConflict(output.to_string()));
        }
    }
    Ok(())
}

fn check_designations(first: &LinesAndResidues, second: &LinesAndResidues) -> Result<(), PreconditionError> {
    let first_set: HashSet<Designation> = first.designations().into_iter().collect();
    let second_set: HashSet<Designation> = second.designations().into_iter().collect();
    if first_set == second_set {
        return Ok(());
    }
    let only_in = |lines: &LinesAndResidues, other: &HashSet<Designation>| {
        lines
            .designations()
            .into_iter()
            .filter(|designation| !other.contains(designation))
            .map(|designation| designation.to_string())
            .collect::<Vec<_>>()
    };
    Err(PreconditionError::DesignationMismatch {
        only_in_first: only_in(first, &second_set),
        only_in_second: only_in(second, &first_set),
    })
}

fn check_labels_present(document: &LinesAndResidues, spec: &MergeSpec) -> Result<(), PreconditionError> {
    let present: BTreeSet<String> = document
        .iter_lines()
        .flat_map(|line| line.labels().map(|label| label.name().to_string()))
        .collect();
    let missing: Vec<String> = spec
        .explicit_inputs()
        .filter(|label| !present.contains(*label))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PreconditionError::UnknownLabels {
            missing,
            present: present.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{parse_document, ParseOptions, AFTER_LINE, BEFORE_LINE};

    fn document(bodies: &[&str]) -> LinesAndResidues {
        let text: String = bodies
            .iter()
            .map(|body| format!("{BEFORE_LINE}\n{body}\n{AFTER_LINE}\n"))
            .collect();
        parse_document(&text, ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_spec() {
        let spec = MergeSpec::parse("Baseline:BaselineRaw/BaselineToClean, Translation, *").unwrap();
        assert!(spec.all_other_rows);
        assert!(!spec.keep_residues);
        assert_eq!(
            spec.items[0].outputs,
            vec!["BaselineRaw".to_string(), "BaselineToClean".to_string()]
        );
        assert_eq!(spec.items[1].outputs, vec!["Translation".to_string()]);
    }

    #[test]
    fn test_parse_spec_rejects_bad_labels() {
        assert!(MergeSpec::parse("Base line").is_err());
        assert!(MergeSpec::parse("Baseline:").is_err());
        assert!(MergeSpec::parse("Gloss,Gloss").is_err());
    }

    #[test]
    fn test_merge_raw_and_annotated() {
        let raw = document(&["N: H 1\nBaseline: kati anu\nTranslation: dog runs"]);
        let annotated = document(&["N: H 1\nBaseline: kati anu\nGloss: dog run\nTranslation: the dog runs"]);

        let merged = merge(
            &raw,
            &MergeSpec::parse("Baseline:BaselineRaw").unwrap(),
            &annotated,
            &MergeSpec::parse("*").unwrap(),
        )
        .unwrap();

        let line = &merged.lines[0];
        let labels: Vec<&str> = line.labels().map(RowLabel::name).collect();
        assert_eq!(labels, vec!["BaselineRaw", "Baseline", "Gloss", "Translation"]);
        assert!(line.get_by_name("BaselineRaw").unwrap().is_aligned());
        assert_eq!(
            line.get_by_name("Translation").unwrap().content(),
            "the dog runs"
        );
    }

    #[test]
    fn test_star_skips_rows_claimed_by_other_side() {
        let first = document(&["N: H 1\nBaseline: a b\nTranslation: old"]);
        let second = document(&["N: H 1\nBaseline: a b\nTranslation: new"]);
        let merged = merge(
            &first,
            &MergeSpec::parse("*").unwrap(),
            &second,
            &MergeSpec::parse("Translation").unwrap(),
        )
        .unwrap();
        let line = &merged.lines[0];
        assert_eq!(line.len(), 2);
        assert_eq!(line.get_by_name("Translation").unwrap().content(), "new");
    }

    #[test]
    fn test_designations_must_match() {
        let first = document(&["N: H 1\nBaseline: a", "N: H 2\nBaseline: b"]);
        let second = document(&["N: H 1\nGloss: x", "N: H 3\nGloss: y"]);
        let err = merge(
            &first,
            &MergeSpec::parse("Baseline").unwrap(),
            &second,
            &MergeSpec::parse("Gloss").unwrap(),
        )
        .unwrap_err();
        match err {
            DryError::Precondition(PreconditionError::DesignationMismatch {
                only_in_first,
                only_in_second,
            }) => {
                assert_eq!(only_in_first, vec!["H 2"]);
                assert_eq!(only_in_second, vec!["H 3"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_output_label_conflict() {
        let err = check_specs(
            &MergeSpec::parse("Baseline").unwrap(),
            &MergeSpec::parse("Baseline").unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, PreconditionError::MergeConflict("Baseline".to_string()));
    }

    #[test]
    fn test_misaligned_rows_are_a_precondition_error() {
        let first = document(&["N: H 1\nBaseline: a b"]);
        let second = document(&["N: H 1\nGloss: x y z"]);
        let err = merge(
            &first,
            &MergeSpec::parse("Baseline").unwrap(),
            &second,
            &MergeSpec::parse("Gloss").unwrap(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DryError::Precondition(PreconditionError::MergedRowLengths { .. })
        ));
    }

    #[test]
    fn test_aligned_unit_row_cannot_join_longer_rows() {
        let first = document(&["N: H 1\nBaseline: a b c"]);
        let second = document(&["N: H 1\nGloss: x"]);
        let err = merge(
            &first,
            &MergeSpec::parse("Baseline").unwrap(),
            &second,
            &MergeSpec::parse("Gloss").unwrap(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DryError::Precondition(PreconditionError::MergedRowLengths { ref lengths, .. })
                if lengths == &[3, 1]
        ));
    }

    #[test]
    fn test_free_row_cannot_become_aligned_label() {
        let first = document(&["N: H 1\nBaseline: a b c"]);
        let second = document(&["N: H 1\nNotes: x y z"]);
        let err = merge(
            &first,
            &MergeSpec::parse("Baseline").unwrap(),
            &second,
            &MergeSpec::parse("Notes:Gloss").unwrap(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DryError::Precondition(PreconditionError::AlignmentConflict { ref target, .. })
                if target == "Gloss"
        ));
    }

    #[test]
    fn test_merged_text_reads_back() {
        let first = document(&["N: H 1\nBaseline: a b\nTranslation: free text here"]);
        let second = document(&["N: H 1\nBaseline: a b\nGloss: x y\nNotes: more free text"]);
        let merged = merge(
            &first,
            &MergeSpec::parse("Translation").unwrap(),
            &second,
            &MergeSpec::parse("*").unwrap(),
        )
        .unwrap();
        let text = merged.to_text().unwrap();
        let reread = parse_document(&text, ParseOptions::default()).unwrap();
        assert_eq!(reread.iter_lines().next().unwrap(), &merged.lines[0]);
    }

    #[test]
    fn test_residues_from_second_file() {
        let first = document(&["N: H 1\nBaseline: a"]);
        let text = format!("% notes\n{BEFORE_LINE}\nN: H 1\nGloss: x\n{AFTER_LINE}\n");
        let second = parse_document(&text, ParseOptions::default()).unwrap();
        let merged = merge(
            &first,
            &MergeSpec::parse("Baseline").unwrap(),
            &second,
            &MergeSpec::parse("Gloss,residues").unwrap(),
        )
        .unwrap();
        let out = merged.to_text().unwrap();
        assert_eq!(
            out,
            format!("% notes\n{BEFORE_LINE}\nN: H 1\nBaseline: a\nGloss: x\n{AFTER_LINE}\n")
        );
    }
}
