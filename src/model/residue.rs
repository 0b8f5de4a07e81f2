//! Residue: file text outside every line group, kept by position
//!
//! Locations are the gaps between line groups. With `n` groups there are `n + 1`
//! gaps, numbered by slot:
//!
//! ```text
//! slot 0 | group 0 | slot 1 | group 1 | ... | group n-1 | slot n
//! ```
//!
//! Slot `k` is conventionally written as the half-integer `k - 0.5`: `-0.5` is the
//! text before the first group, `i + 0.5` the text right after group `i`.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResidueLocation {
    slot: usize,
}

impl ResidueLocation {
    pub fn from_slot(slot: usize) -> Self {
        Self { slot }
    }

    /// The gap immediately before group `index` (`index - 0.5`).
    pub fn before(index: usize) -> Self {
        Self { slot: index }
    }

    /// The gap immediately after group `index` (`index + 0.5`).
    pub fn after(index: usize) -> Self {
        Self { slot: index + 1 }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn as_half_integer(&self) -> f64 {
        self.slot as f64 - 0.5
    }
}

impl fmt::Display for ResidueLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            0 => f.write_str("-0.5"),
            slot => write!(f, "{}.5", slot - 1),
        }
    }
}

/// Location -> exact original text. Absent locations read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResidueMap {
    residues: BTreeMap<ResidueLocation, String>,
}

impl ResidueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: ResidueLocation, text: impl Into<String>) -> Option<String> {
        self.residues.insert(location, text.into())
    }

    pub fn get(&self, location: ResidueLocation) -> &str {
        self.residues.get(&location).map_or("", String::as_str)
    }

    pub fn contains(&self, location: ResidueLocation) -> bool {
        self.residues.contains_key(&location)
    }

    pub fn locations(&self) -> impl Iterator<Item = ResidueLocation> + '_ {
        self.residues.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResidueLocation, &str)> {
        self.residues.iter().map(|(loc, text)| (*loc, text.as_str()))
    }

    /// Residues holding anything besides whitespace.
    pub fn visible(&self) -> impl Iterator<Item = (ResidueLocation, &str)> {
        self.iter()
            .filter(|(_, text)| text.chars().any(|c| !c.is_whitespace()))
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}
