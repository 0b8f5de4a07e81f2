//! Line building
//!
//! Turns one group body into a [`Line`]. Each non-blank physical row is
//! `<label>:<content>`. Aligned labels split their content into cells on spaces
//! and each cell into morphemes on `-`; unaligned labels keep the stripped content
//! as a single cell. The `N` row becomes the line's designation.
//!
//! Every failure here is fatal for the whole file: the diagnostic quotes the
//! group so the user can find and fix it.

use crate::error::{DryError, FormatError};
use crate::model::{Cell, Designation, LabelTable, Line, Row, RowLabel};

pub struct LineBuilder<'t> {
    labels: &'t mut LabelTable,
}

impl<'t> LineBuilder<'t> {
    pub fn new(labels: &'t mut LabelTable) -> Self {
        Self { labels }
    }

    pub fn build(&mut self, body: &str) -> Result<Line, DryError> {
        let mut designation: Option<Designation> = None;
        let mut rows = Vec::new();
        let mut aligned_len: Option<usize> = None;

        for raw_row in body.split('\n') {
            if raw_row.trim().is_empty() {
                continue;
            }
            let (label_text, content) =
                raw_row
                    .split_once(RowLabel::SEPARATOR)
                    .ok_or_else(|| FormatError::MissingLabelSeparator {
                        group: body.to_string(),
                        row: raw_row.to_string(),
                    })?;
            let content = content.trim();

            let label = self
                .labels
                .resolve(label_text)
                .map_err(|invalid| FormatError::InvalidLabel {
                    label: invalid.label,
                    reason: invalid.reason,
                })?;

            if label.is_designation() {
                if designation.is_some() {
                    return Err(FormatError::DuplicateRowLabel {
                        designation: content.to_string(),
                        label: label.name().to_string(),
                    }
                    .into());
                }
                designation = Some(Designation::new(content));
                continue;
            }

            let cells: Vec<Cell> = if label.is_aligned() {
                let cells: Vec<Cell> = content
                    .split(Row::WORD_DELIMITER)
                    .map(Cell::parse)
                    .collect();
                match aligned_len {
                    None => aligned_len = Some(cells.len()),
                    Some(expected) if expected != cells.len() => {
                        return Err(FormatError::RowLengthMismatch {
                            group: body.to_string(),
                            label: label.name().to_string(),
                            expected,
                            actual: cells.len(),
                            row: content.to_string(),
                        }
                        .into());
                    }
                    Some(_) => {}
                }
                cells
            } else {
                vec![Cell::from_text(content)]
            };

            rows.push(Row::new(label, cells)?);
        }

        let designation = designation.ok_or_else(|| FormatError::MissingDesignation {
            group: body.to_string(),
        })?;
        Line::new(designation, rows)
    }
}
