//! Error taxonomy
//!
//! Errors fall into four groups, each with its own type so callers can decide how
//! to present them:
//!
//! - [`FormatError`]: the file itself is malformed. The user has to fix it; the
//!   diagnostic echoes the offending text.
//! - [`PreconditionError`]: an operation was refused before anything was written.
//! - [`InvariantViolation`]: a defect inside drybones (or a caller building values
//!   by hand). Never reachable from well-formed input and never presented as
//!   "fix your file".
//! - [`Advisory`]: not an error at all. Reported alongside a successful result.

use crate::model::residue::ResidueLocation;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide error.
#[derive(Debug, Error)]
pub enum DryError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("internal error (this is a bug in drybones): {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error(transparent)]
    Output(#[from] crate::formats::OutputError),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("project error: {0}")]
    Project(String),

    #[error(transparent)]
    Diacritics(#[from] crate::diacritics::DiacriticsError),

    #[error("{failed} of {total} files failed to parse")]
    CheckFailed { failed: usize, total: usize },
}

impl DryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DryError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the error indicates a defect in drybones rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, DryError::Invariant(_))
    }
}

/// The file cannot be losslessly round-tripped past this point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("row has no label (expected `<label>:` before the content):\n{row:?}\nin line group:\n{}", quote_group(.group))]
    MissingLabelSeparator { group: String, row: String },

    #[error("expected row of length {expected} but got {actual} for label {label:?}:\n{row}\nin line group:\n{}", quote_group(.group))]
    RowLengthMismatch {
        group: String,
        label: String,
        expected: usize,
        actual: usize,
        row: String,
    },

    #[error("duplicate row label {label:?} in line {designation:?}")]
    DuplicateRowLabel { designation: String, label: String },

    #[error("duplicate line designation: {designation:?}")]
    DuplicateDesignation { designation: String },

    #[error("line group has no designation row (`N: ...`):\n{}", quote_group(.group))]
    MissingDesignation { group: String },

    #[error("invalid row label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: String },
}

/// Something about the request makes it unsafe to proceed; nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("output file already exists: {} (pass --overwrite to edit in place)", .0.display())]
    OutputExists(PathBuf),

    #[error("could not find a free output path next to {} after {attempts} attempts; check the directory or raise editing.max_redirect_attempts", .path.display())]
    NoFreeSiblingPath { path: PathBuf, attempts: usize },

    #[error("designations differ between the files being combined; only in first: {only_in_first:?}; only in second: {only_in_second:?}")]
    DesignationMismatch {
        only_in_first: Vec<String>,
        only_in_second: Vec<String>,
    },

    #[error("line {0:?} was not part of the file being edited")]
    UnknownDesignation(String),

    #[error("these row labels were not found: {missing:?} (labels present: {present:?})")]
    UnknownLabels {
        missing: Vec<String>,
        present: Vec<String>,
    },

    #[error("several row labels map to {target:?}: {sources:?}; each label must map to a unique new label")]
    LabelClash { target: String, sources: Vec<String> },

    #[error("{label:?} rows are {} but {target:?} is always read back {}; the written file would not parse the same", alignment(.label_aligned), alignment(.target_aligned))]
    AlignmentConflict {
        label: String,
        label_aligned: bool,
        target: String,
        target_aligned: bool,
    },

    #[error("invalid row label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("invalid mapping {0:?}: expected comma-joined `Old:New` pairs, e.g. 'TargetLang:Baseline,ContactLang:Translation'")]
    InvalidMapping(String),

    #[error("invalid merge selection {0:?}: expected `*` or comma-joined `Label[:Out1/Out2]` items")]
    InvalidMergeSpec(String),

    #[error("row label {0:?} is claimed by both merge selections")]
    MergeConflict(String),

    #[error("merged rows of line {designation:?} do not align (row lengths {lengths:?})")]
    MergedRowLengths {
        designation: String,
        lengths: Vec<usize>,
    },

    #[error("text name {name:?} is used by several files: {paths:?}")]
    DuplicateTextName { name: String, paths: Vec<PathBuf> },

    #[error("no text named {name:?}{}", suggestion_list(.suggestions))]
    UnknownText {
        name: String,
        suggestions: Vec<String>,
    },
}

/// A defect inside drybones or a caller constructing values directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("row lengths must all be 1 or a single shared N, got {lengths:?}")]
    RowLengths { lengths: Vec<usize> },

    #[error("aligned rows must share one length, got {lengths:?}")]
    AlignedRowLengths { lengths: Vec<usize> },

    #[error("the text to be written does not read back: {reason}")]
    UnreadableOutput { reason: String },

    #[error("unaligned row {label:?} must have exactly one cell, got {cells}")]
    UnalignedRowWidth { label: String, cells: usize },

    #[error("the designation label {0:?} cannot appear among a line's content rows")]
    ReservedLabelInRows(String),

    #[error("label {label:?} already interned with aligned={existing}")]
    ConflictingLabelAlignment { label: String, existing: bool },

    #[error("residue at location {location} was never written (document has {groups} line groups)")]
    UnaccountedResidue {
        location: ResidueLocation,
        groups: usize,
    },
}

/// Recoverable conditions: reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Visible text living outside every line group.
    StrayResidue {
        location: ResidueLocation,
        excerpt: String,
    },
    /// The last line group was never closed.
    UnterminatedGroup { index: usize },
    /// The destination changed on disk between load and save.
    ConcurrentModification {
        original: PathBuf,
        written_to: PathBuf,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::StrayResidue { location, excerpt } => write!(
                f,
                "text outside any line at location {location}: {excerpt:?}"
            ),
            Advisory::UnterminatedGroup { index } => {
                write!(f, "line group {index} has no closing delimiter")
            }
            Advisory::ConcurrentModification {
                original,
                written_to,
            } => write!(
                f,
                "{} was modified by someone else since it was loaded; wrote to {} instead",
                original.display(),
                written_to.display()
            ),
        }
    }
}

fn alignment(aligned: &bool) -> &'static str {
    if *aligned {
        "aligned"
    } else {
        "unaligned"
    }
}

fn suggestion_list(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean one of: {}?", suggestions.join(", "))
    }
}

fn quote_group(group: &str) -> String {
    let mut quoted = String::new();
    for raw in group.trim_matches('\n').split('\n') {
        quoted.push_str("> ");
        quoted.push_str(raw);
        quoted.push('\n');
    }
    quoted
}
