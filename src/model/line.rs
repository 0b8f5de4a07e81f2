//! Line: one annotated unit (typically a sentence)
//!
//! Every row of a line is either unit-length (free text) or shares a single
//! aligned length `N`. The check runs at construction: a line with row lengths
//! outside `{}`, `{1}`, `{N}`, `{1, N}` is never built. That failure is an
//! internal error, since the parser already rejects mismatched aligned rows with
//! a proper format diagnostic.
//!
//! The designation (`N:` row in the file) is held separately from the content
//! rows and is synthesized back in by the serializer and the renderer.

use super::designation::Designation;
use super::row::Row;
use super::row_label::RowLabel;
use crate::error::{DryError, FormatError, InvariantViolation};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::ops::Index;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    designation: Designation,
    rows: Vec<Row>,
    #[serde(skip)]
    row_index: HashMap<String, usize>,
}

impl Line {
    pub fn new(designation: impl Into<Designation>, rows: Vec<Row>) -> Result<Self, DryError> {
        let designation = designation.into();
        validate_row_lengths(&rows)?;

        let mut row_index = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let name = row.label().name();
            if row.label().is_designation() {
                return Err(InvariantViolation::ReservedLabelInRows(name.to_string()).into());
            }
            if row_index.insert(name.to_string(), i).is_some() {
                return Err(FormatError::DuplicateRowLabel {
                    designation: designation.to_string(),
                    label: name.to_string(),
                }
                .into());
            }
        }

        Ok(Self {
            designation,
            rows,
            row_index,
        })
    }

    pub fn designation(&self) -> &Designation {
        &self.designation
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Number of content rows (the designation is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, label: &RowLabel) -> Option<&Row> {
        self.get_by_name(label.name())
            .filter(|row| row.label().as_ref() == label)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Row> {
        self.row_index.get(name).map(|&i| &self.rows[i])
    }

    pub fn labels(&self) -> impl Iterator<Item = &RowLabel> {
        self.rows.iter().map(|row| row.label().as_ref())
    }

    /// The shared length of the aligned rows, if there are any.
    pub fn aligned_len(&self) -> Option<usize> {
        self.rows
            .iter()
            .filter(|row| row.is_aligned())
            .map(Row::len)
            .max()
    }

    pub fn is_parsed_and_glossed(&self) -> bool {
        self.row_index.contains_key("Parse") && self.row_index.contains_key("Gloss")
    }

    /// A copy of this line with `row` added, replacing any row with the same label name.
    pub fn with_row(&self, row: Row) -> Result<Self, DryError> {
        let mut rows = self.rows.clone();
        match self.row_index.get(row.label().name()) {
            Some(&i) => rows[i] = row,
            None => rows.push(row),
        }
        Self::new(self.designation.clone(), rows)
    }

    /// A copy of this line without the row named `name`.
    pub fn without_label(&self, name: &str) -> Result<Self, DryError> {
        let rows = self
            .rows
            .iter()
            .filter(|row| row.label().name() != name)
            .cloned()
            .collect();
        Self::new(self.designation.clone(), rows)
    }

    /// A copy with the same rows under another designation.
    pub fn redesignated(&self, designation: impl Into<Designation>) -> Result<Self, DryError> {
        Self::new(designation, self.rows.clone())
    }
}

impl Index<&RowLabel> for Line {
    type Output = Row;

    fn index(&self, label: &RowLabel) -> &Row {
        self.get(label)
            .unwrap_or_else(|| panic!("line {} has no row labeled {label}", self.designation))
    }
}

impl<'a> IntoIterator for &'a Line {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Row lengths must reduce to at most two distinct values, and if two, one is 1.
/// Aligned rows additionally share one length, so an aligned row of one word
/// cannot sit next to an aligned row of three.
pub fn validate_row_lengths(rows: &[Row]) -> Result<(), InvariantViolation> {
    let lengths: Vec<usize> = distinct_lengths(rows.iter());
    if !matches!(lengths.as_slice(), [] | [_] | [1, _]) {
        return Err(InvariantViolation::RowLengths { lengths });
    }
    let aligned = distinct_lengths(rows.iter().filter(|row| row.is_aligned()));
    if aligned.len() > 1 {
        return Err(InvariantViolation::AlignedRowLengths { lengths: aligned });
    }
    Ok(())
}

fn distinct_lengths<'a>(rows: impl Iterator<Item = &'a Row>) -> Vec<usize> {
    rows.map(Row::len)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
