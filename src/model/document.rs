//! The result of parsing a whole file: lines in file order, each with the exact
//! group text it came from, plus the residues and any advisories.

use super::designation::Designation;
use super::line::Line;
use super::residue::ResidueMap;
use crate::error::Advisory;
use std::collections::HashMap;

/// A parsed line together with the raw group body it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub source: String,
    pub line: Line,
    /// False when the group had no closing delimiter in the file.
    pub closed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinesAndResidues {
    pub lines: Vec<ParsedLine>,
    pub residues: ResidueMap,
    pub advisories: Vec<Advisory>,
}

impl LinesAndResidues {
    pub fn iter_lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().map(|parsed| &parsed.line)
    }

    /// Designations in file order.
    pub fn designations(&self) -> Vec<Designation> {
        self.iter_lines()
            .map(|line| line.designation().clone())
            .collect()
    }

    /// Every parsed line keyed by designation; the seed for an editing session.
    pub fn lines_by_designation(&self) -> HashMap<Designation, Line> {
        self.iter_lines()
            .map(|line| (line.designation().clone(), line.clone()))
            .collect()
    }

    pub fn find(&self, designation: &str) -> Option<&Line> {
        self.iter_lines()
            .find(|line| line.designation().as_str() == designation)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
