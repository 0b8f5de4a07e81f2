//! Parsing .dry files
//!
//! Two stages:
//!
//! 1. [`line_groups`] splits the text into group bodies and residues.
//! 2. [`line_builder`] turns each body into a [`Line`](crate::model::Line).
//!
//! One [`LabelTable`] is shared across all groups of a parse so equal labels are
//! shared values.

pub mod line_builder;
pub mod line_groups;

pub use line_builder::LineBuilder;
pub use line_groups::{split_line_groups, LineGroups, RawGroup, AFTER_LINE, BEFORE_LINE};

use crate::error::{DryError, FormatError};
use crate::model::{LabelTable, LinesAndResidues, ParsedLine};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fail on two lines with the same designation.
    pub enforce_unique_designations: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            enforce_unique_designations: true,
        }
    }
}

/// Parse full file contents.
pub fn parse_document(text: &str, options: ParseOptions) -> Result<LinesAndResidues, DryError> {
    let mut labels = LabelTable::new();
    parse_document_with_labels(text, options, &mut labels)
}

/// Parse with a caller-provided label table, e.g. to share labels across files.
pub fn parse_document_with_labels(
    text: &str,
    options: ParseOptions,
    labels: &mut LabelTable,
) -> Result<LinesAndResidues, DryError> {
    let LineGroups {
        groups,
        residues,
        advisories,
    } = split_line_groups(text);

    let mut builder = LineBuilder::new(labels);
    let mut seen = HashSet::new();
    let mut lines = Vec::with_capacity(groups.len());

    for group in groups {
        let line = builder.build(group.body)?;
        if options.enforce_unique_designations && !seen.insert(line.designation().clone()) {
            return Err(FormatError::DuplicateDesignation {
                designation: line.designation().to_string(),
            }
            .into());
        }
        lines.push(ParsedLine {
            source: group.body.to_string(),
            line,
            closed: group.closed,
        });
    }

    tracing::debug!(
        lines = lines.len(),
        residues = residues.len(),
        "parsed document"
    );

    Ok(LinesAndResidues {
        lines,
        residues,
        advisories,
    })
}

pub fn read_file(path: &Path) -> Result<String, DryError> {
    fs::read_to_string(path).map_err(|e| DryError::io(path, e))
}

/// Read and parse a .dry file.
pub fn parse_file(path: &Path, options: ParseOptions) -> Result<LinesAndResidues, DryError> {
    let text = read_file(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "loaded file");
    parse_document(&text, options)
}
