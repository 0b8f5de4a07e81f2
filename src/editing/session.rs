//! Read-modify-write of one file
//!
//! [`FileEditSession::open`] parses the file and decides where the result goes;
//! collaborators then replace lines; [`FileEditSession::finish`] writes
//! everything back in the original order with residues interleaved.
//!
//! Concurrent edits (say, the same file open in a text editor during a long
//! annotation session) are detected, not locked against: the destination is
//! fingerprinted at open and re-checked right before writing. If it changed, the
//! result goes to the first free `<stem>_<k>.dry` instead and an advisory says
//! where.
//!
//! Nothing is written unless the composed text parses again.

use super::fingerprint::Fingerprint;
use crate::config::EditingConfig;
use crate::error::{Advisory, DryError, InvariantViolation, PreconditionError};
use crate::formats::compose_document;
use crate::model::{Designation, Line, LinesAndResidues};
use crate::parsing::{parse_document, read_file, ParseOptions};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DRY_EXTENSION: &str = "dry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Appended to the input stem when not overwriting.
    pub output_suffix: String,
    /// Sibling names tried after a concurrent modification.
    pub max_redirect_attempts: usize,
    pub parse: ParseOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            output_suffix: "_dryout".to_string(),
            max_redirect_attempts: 100,
            parse: ParseOptions::default(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(editing: &EditingConfig) -> Self {
        Self {
            output_suffix: editing.output_suffix.clone(),
            max_redirect_attempts: editing.max_redirect_attempts,
            parse: ParseOptions::default(),
        }
    }
}

/// What the destination looked like when the session was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DestinationGuard {
    /// A fresh output file that must still not exist at finish.
    Absent,
    /// The file being overwritten, by content.
    Unchanged(Fingerprint),
}

/// Where the output landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishReport {
    pub written_to: PathBuf,
    pub redirected: bool,
    pub advisory: Option<Advisory>,
}

#[derive(Debug)]
pub struct FileEditSession {
    source_path: PathBuf,
    output_path: PathBuf,
    document: LinesAndResidues,
    order: Vec<Designation>,
    lines_by_designation: HashMap<Designation, Line>,
    guard: DestinationGuard,
    options: SessionOptions,
}

impl FileEditSession {
    pub fn open(path: impl AsRef<Path>, overwrite: bool) -> Result<Self, DryError> {
        Self::open_with(path, overwrite, SessionOptions::default())
    }

    pub fn open_with(
        path: impl AsRef<Path>,
        overwrite: bool,
        options: SessionOptions,
    ) -> Result<Self, DryError> {
        let source_path = path.as_ref().to_path_buf();

        let output_path = if overwrite {
            source_path.clone()
        } else {
            let output_path = suffixed_path(&source_path, &options.output_suffix);
            if output_path.exists() {
                return Err(PreconditionError::OutputExists(output_path).into());
            }
            output_path
        };

        let text = read_file(&source_path)?;
        let guard = if overwrite {
            DestinationGuard::Unchanged(Fingerprint::of_bytes(text.as_bytes()))
        } else {
            DestinationGuard::Absent
        };
        let document = parse_document(&text, options.parse)?;
        let order = document.designations();
        let lines_by_designation = document.lines_by_designation();

        tracing::debug!(
            source = %source_path.display(),
            output = %output_path.display(),
            lines = order.len(),
            "opened edit session"
        );

        Ok(Self {
            source_path,
            output_path,
            document,
            order,
            lines_by_designation,
            guard,
            options,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// The document as parsed, before any edits.
    pub fn document(&self) -> &LinesAndResidues {
        &self.document
    }

    /// Designations in file order.
    pub fn order(&self) -> &[Designation] {
        &self.order
    }

    /// Current lines in file order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.order
            .iter()
            .filter_map(|designation| self.lines_by_designation.get(designation))
    }

    pub fn get(&self, designation: &str) -> Option<&Line> {
        self.lines_by_designation.get(designation)
    }

    /// Direct access for collaborators that edit many lines at once. Entries
    /// removed here are written back as originally parsed.
    pub fn lines_by_designation_mut(&mut self) -> &mut HashMap<Designation, Line> {
        &mut self.lines_by_designation
    }

    /// Replace the line with the same designation, returning the previous one.
    pub fn replace(&mut self, line: Line) -> Result<Option<Line>, DryError> {
        if self.document.find(line.designation().as_str()).is_none() {
            return Err(PreconditionError::UnknownDesignation(line.designation().to_string()).into());
        }
        Ok(self
            .lines_by_designation
            .insert(line.designation().clone(), line))
    }

    /// Compose and write the file. The destination is re-checked immediately
    /// before writing; see the module docs for what happens if it changed.
    pub fn finish(self) -> Result<FinishReport, DryError> {
        let contents = compose_document(&self.document, &self.lines_by_designation)?;
        if let Err(reason) = parse_document(&contents, self.options.parse) {
            return Err(InvariantViolation::UnreadableOutput {
                reason: reason.to_string(),
            }
            .into());
        }

        let current = Fingerprint::of_file_if_exists(&self.output_path)?;
        let modified = match self.guard {
            DestinationGuard::Absent => current.is_some(),
            DestinationGuard::Unchanged(initial) => current != Some(initial),
        };

        if !modified {
            write_atomically(&self.output_path, &contents)?;
            tracing::debug!(path = %self.output_path.display(), "wrote file");
            return Ok(FinishReport {
                written_to: self.output_path,
                redirected: false,
                advisory: None,
            });
        }

        let redirect = free_sibling_path(&self.output_path, self.options.max_redirect_attempts)?;
        write_atomically(&redirect, &contents)?;
        let advisory = Advisory::ConcurrentModification {
            original: self.output_path,
            written_to: redirect.clone(),
        };
        tracing::warn!("{advisory}");

        Ok(FinishReport {
            written_to: redirect,
            redirected: true,
            advisory: Some(advisory),
        })
    }
}

/// `dir/name.dry` -> `dir/name<suffix>.dry`
pub fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}.{DRY_EXTENSION}"))
}

/// First `<stem>_<k>.dry` (k = 1, 2, ...) that does not exist yet.
pub fn free_sibling_path(path: &Path, max_attempts: usize) -> Result<PathBuf, PreconditionError> {
    (1..=max_attempts)
        .map(|k| suffixed_path(path, &format!("_{k}")))
        .find(|candidate| !candidate.exists())
        .ok_or_else(|| PreconditionError::NoFreeSiblingPath {
            path: path.to_path_buf(),
            attempts: max_attempts,
        })
}

/// Write via a temp file in the same directory, then rename over `path`.
fn write_atomically(path: &Path, contents: &str) -> Result<(), DryError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(|e| DryError::io(dir, e))?;
    let temp_path = file.path().to_path_buf();
    file.write_all(contents.as_bytes())
        .map_err(|e| DryError::io(&temp_path, e))?;
    file.flush().map_err(|e| DryError::io(&temp_path, e))?;
    file.persist(path)
        .map_err(|e| DryError::io(path, e.error))?;
    Ok(())
}
