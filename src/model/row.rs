//! Row: one tier of a line
//!
//! An aligned row holds one cell per word; an unaligned row holds exactly one cell
//! with the whole free text.

use super::cell::Cell;
use super::row_label::RowLabel;
use crate::error::InvariantViolation;
use serde::Serialize;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    label: Rc<RowLabel>,
    cells: Vec<Cell>,
}

impl Row {
    /// Separates cells (words) of an aligned row.
    pub const WORD_DELIMITER: char = ' ';

    pub fn new(label: Rc<RowLabel>, cells: Vec<Cell>) -> Result<Self, InvariantViolation> {
        if label.is_aligned() {
            if cells.is_empty() {
                return Err(InvariantViolation::RowLengths { lengths: vec![0] });
            }
        } else if cells.len() != 1 {
            return Err(InvariantViolation::UnalignedRowWidth {
                label: label.name().to_string(),
                cells: cells.len(),
            });
        }
        Ok(Self { label, cells })
    }

    /// A single-cell row holding `text` verbatim.
    pub fn with_text(label: Rc<RowLabel>, text: impl Into<String>) -> Result<Self, InvariantViolation> {
        Self::new(label, vec![Cell::from_text(text)])
    }

    pub fn label(&self) -> &Rc<RowLabel> {
        &self.label
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_aligned(&self) -> bool {
        self.label.is_aligned()
    }

    /// Cell texts joined the way they appear in the file.
    pub fn content(&self) -> String {
        self.cells
            .iter()
            .map(Cell::text)
            .collect::<Vec<_>>()
            .join(&Self::WORD_DELIMITER.to_string())
    }

    /// The same cells under another label.
    pub fn relabeled(&self, label: Rc<RowLabel>) -> Result<Self, InvariantViolation> {
        Self::new(label, self.cells.clone())
    }
}
