//! Relabeling rows across a whole file.
//!
//! A mapping is written `Old:New,Old2:New2`. Every `Old` must occur somewhere in
//! the file, and after mapping no two labels of the file may share a name.
//! Relabeled rows keep their alignment, so a row may not be moved onto a
//! default label whose alignment differs.

use super::session::FileEditSession;
use crate::error::{DryError, PreconditionError};
use crate::model::row_label::default_label;
use crate::model::{LabelTable, Line, RowLabel};
use std::collections::{BTreeMap, BTreeSet};

pub type LabelMapping = BTreeMap<String, String>;

pub fn parse_mapping(text: &str) -> Result<LabelMapping, PreconditionError> {
    let invalid = || PreconditionError::InvalidMapping(text.to_string());
    let mut mapping = LabelMapping::new();
    for pair in text.split(',') {
        let (old, new) = pair.split_once(RowLabel::SEPARATOR).ok_or_else(invalid)?;
        let (old, new) = (old.trim(), new.trim());
        if old.is_empty() || new.contains(RowLabel::SEPARATOR) {
            return Err(invalid());
        }
        RowLabel::new(new, false).map_err(|_| invalid())?;
        if mapping.insert(old.to_string(), new.to_string()).is_some() {
            return Err(invalid());
        }
    }
    Ok(mapping)
}

/// Reject mappings naming absent labels or merging two labels into one.
pub fn check_mapping(mapping: &LabelMapping, present: &BTreeSet<String>) -> Result<(), PreconditionError> {
    let missing: Vec<String> = mapping
        .keys()
        .filter(|old| !present.contains(*old))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(PreconditionError::UnknownLabels {
            missing,
            present: present.iter().cloned().collect(),
        });
    }

    let mut sources_by_target: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for label in present {
        let target = mapping.get(label).unwrap_or(label);
        sources_by_target
            .entry(target.as_str())
            .or_default()
            .push(label.clone());
    }
    match sources_by_target
        .into_iter()
        .find(|(_, sources)| sources.len() > 1)
    {
        Some((target, sources)) => Err(PreconditionError::LabelClash {
            target: target.to_string(),
            sources,
        }),
        None => Ok(()),
    }
}

/// Fail when rows labeled `label` would be written under `target` but a parser
/// reads `target` with the other alignment.
pub fn check_target_alignment(label: &RowLabel, target: &str) -> Result<(), PreconditionError> {
    match default_label(target) {
        Some(known) if known.is_aligned() != label.is_aligned() => {
            Err(PreconditionError::AlignmentConflict {
                label: label.name().to_string(),
                label_aligned: label.is_aligned(),
                target: target.to_string(),
                target_aligned: known.is_aligned(),
            })
        }
        _ => Ok(()),
    }
}

pub fn relabel_line(line: &Line, mapping: &LabelMapping, labels: &mut LabelTable) -> Result<Line, DryError> {
    let mut rows = Vec::with_capacity(line.len());
    for row in line {
        match mapping.get(row.label().name()) {
            Some(new) => {
                let label = row
                    .label()
                    .relabel(new.as_str())
                    .map_err(|invalid| PreconditionError::InvalidMapping(invalid.to_string()))?;
                let label = labels.intern(label)?;
                rows.push(row.relabeled(label)?);
            }
            None => rows.push(row.clone()),
        }
    }
    Line::new(line.designation().clone(), rows)
}

/// Apply `mapping` to every line of the session. Returns how many rows changed.
pub fn relabel_session(session: &mut FileEditSession, mapping: &LabelMapping) -> Result<usize, DryError> {
    let present: BTreeSet<String> = session
        .lines()
        .flat_map(|line| line.labels().map(|label| label.name().to_string()))
        .collect();
    check_mapping(mapping, &present)?;

    for label in session.lines().flat_map(|line| line.labels()) {
        if let Some(new) = mapping.get(label.name()) {
            check_target_alignment(label, new)?;
        }
    }

    let mut labels = LabelTable::new();
    let relabeled: Vec<Line> = session
        .lines()
        .map(|line| relabel_line(line, mapping, &mut labels))
        .collect::<Result<_, _>>()?;

    let mut changed = 0;
    for line in relabeled {
        changed += line
            .labels()
            .filter(|label| mapping.values().any(|new| new == label.name()))
            .count();
        session.replace(line)?;
    }
    tracing::debug!(rows = changed, "relabeled rows");
    Ok(changed)
}
