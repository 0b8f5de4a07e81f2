//! Cell: one aligned slot of a row
//!
//! A cell is an ordered, non-empty sequence of morpheme strings. Its joined text
//! is computed once at construction and never changes.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    morphemes: Vec<String>,
    #[serde(skip)]
    text: String,
}

impl Cell {
    /// Joins morphemes inside a cell, e.g. `kat-i`.
    pub const DELIMITER: char = '-';

    pub fn new(morphemes: Vec<String>) -> Self {
        let morphemes = if morphemes.is_empty() {
            vec![String::new()]
        } else {
            morphemes
        };
        let text = morphemes.join(&Self::DELIMITER.to_string());
        Self { morphemes, text }
    }

    /// A single-morpheme cell holding `text` as-is (used for unaligned rows).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![text.into()])
    }

    /// Split aligned cell text on the morpheme delimiter, stripping each piece.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.trim()
                .split(Self::DELIMITER)
                .map(|m| m.trim().to_string())
                .collect(),
        )
    }

    pub fn morphemes(&self) -> &[String] {
        &self.morphemes
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
