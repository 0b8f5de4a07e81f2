//! Row labels and the per-parse interning table
//!
//! A [`RowLabel`] names the role of a row (`Baseline`, `Gloss`, ...) and says
//! whether its cells align column-by-column with the other aligned rows of a line.
//! Equality includes the alignment flag; [`LabelTable`] makes sure a parse
//! session never hands out two labels with the same name but different flags.

use crate::error::InvariantViolation;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RowLabel {
    name: String,
    aligned: bool,
}

/// A label string that can never be used as a row label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid row label {label:?}: {reason}")]
pub struct InvalidLabel {
    pub label: String,
    pub reason: String,
}

impl RowLabel {
    /// Separates the label from the row content in the file.
    pub const SEPARATOR: char = ':';
    /// Merge selections use this to mean "every other row".
    pub const ALL_OTHER_ROWS: char = '*';
    /// Merge selections use this to copy one row under several labels.
    pub const MULTIPLE_ROWS_SEPARATOR: char = '/';
    /// Merge selections use this to pick which file's residues survive.
    pub const RESIDUES_PSEUDO_LABEL: &'static str = "residues";
    /// The label carrying a line's designation.
    pub const DESIGNATION: &'static str = "N";

    const PROHIBITED_CHARS: [char; 7] = [
        ' ',
        '\t',
        '\n',
        '\r',
        Self::SEPARATOR,
        Self::ALL_OTHER_ROWS,
        Self::MULTIPLE_ROWS_SEPARATOR,
    ];

    pub fn new(name: impl Into<String>, aligned: bool) -> Result<Self, InvalidLabel> {
        let name = name.into();
        validate(&name)?;
        Ok(Self { name, aligned })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    pub fn is_designation(&self) -> bool {
        self.name == Self::DESIGNATION
    }

    /// `Gloss` -> `Gloss:`
    pub fn with_separator(&self) -> String {
        format!("{}{}", self.name, Self::SEPARATOR)
    }

    /// Same alignment, different name.
    pub fn relabel(&self, name: impl Into<String>) -> Result<Self, InvalidLabel> {
        Self::new(name, self.aligned)
    }
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn validate(name: &str) -> Result<(), InvalidLabel> {
    let invalid = |reason: String| InvalidLabel {
        label: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("label is empty".to_string()));
    }
    let mut prohibited: Vec<char> = name
        .chars()
        .filter(|c| c.is_whitespace() || RowLabel::PROHIBITED_CHARS.contains(c))
        .collect();
    if !prohibited.is_empty() {
        prohibited.sort_unstable();
        prohibited.dedup();
        return Err(invalid(format!(
            "contains prohibited characters {prohibited:?}"
        )));
    }
    if name == RowLabel::RESIDUES_PSEUDO_LABEL {
        return Err(invalid("this name is reserved".to_string()));
    }
    Ok(())
}

/// Well-known labels and their alignment.
pub static DEFAULT_ROW_LABELS: Lazy<Vec<RowLabel>> = Lazy::new(|| {
    [
        (RowLabel::DESIGNATION, false),
        ("Baseline", true),
        ("Translation", false),
        ("Parse", true),
        ("Gloss", true),
        ("Class", true),
        ("Wordgloss", true),
        ("Wordclass", true),
        ("Production", false),
        ("Judgment", false),
    ]
    .into_iter()
    .map(|(name, aligned)| RowLabel {
        name: name.to_string(),
        aligned,
    })
    .collect()
});

pub fn default_label(name: &str) -> Option<&'static RowLabel> {
    DEFAULT_ROW_LABELS.iter().find(|label| label.name == name)
}

/// Session-scoped label interning.
///
/// Lives for one parse (or one editing command) and is passed by reference into
/// whatever builds rows, so equal labels share one allocation.
#[derive(Debug, Default)]
pub struct LabelTable {
    labels: HashMap<String, Rc<RowLabel>>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a label by name, creating it on first sight. Well-known labels
    /// get their known alignment; anything else is unaligned.
    pub fn resolve(&mut self, name: &str) -> Result<Rc<RowLabel>, InvalidLabel> {
        if let Some(label) = self.labels.get(name) {
            return Ok(Rc::clone(label));
        }
        let label = match default_label(name) {
            Some(known) => known.clone(),
            None => RowLabel::new(name, false)?,
        };
        let label = Rc::new(label);
        self.labels.insert(name.to_string(), Rc::clone(&label));
        Ok(label)
    }

    /// Intern an explicitly built label.
    pub fn intern(&mut self, label: RowLabel) -> Result<Rc<RowLabel>, InvariantViolation> {
        if let Some(existing) = self.labels.get(label.name()) {
            if existing.is_aligned() != label.is_aligned() {
                return Err(InvariantViolation::ConflictingLabelAlignment {
                    label: label.name,
                    existing: existing.is_aligned(),
                });
            }
            return Ok(Rc::clone(existing));
        }
        let label = Rc::new(label);
        self.labels
            .insert(label.name().to_string(), Rc::clone(&label));
        Ok(label)
    }

    pub fn get(&self, name: &str) -> Option<Rc<RowLabel>> {
        self.labels.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
