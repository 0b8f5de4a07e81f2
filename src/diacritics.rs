//! Accent equivalence tables
//!
//! Transcriptions of one language often spell the same accented character
//! several ways: a precomposed code point, a base letter plus a combining mark,
//! or an ASCII stand-in typed before the right keyboard was at hand. A project
//! lists these in `.drybones/diacritics.conf`, one entry per line:
//!
//! ```text
//! é e e\u0301 e'
//! ```
//!
//! The first field is the preferred spelling (the key), the second its
//! unaccented base, and the rest are alternatives that mean the same as the
//! key. Alternatives may use `\uXXXX`, `\UXXXXXXXX`, `\xXX` and `\\` escapes so
//! combining marks can be written visibly. Blank lines are skipped.

use crate::error::DryError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Escapes accepted in alternatives: `\uXXXX`, `\UXXXXXXXX`, `\xXX`, `\\`.
static ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:u([0-9a-fA-F]{4})|U([0-9a-fA-F]{8})|x([0-9a-fA-F]{2})|(\\))")
        .expect("static regex must compile")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiacriticsError {
    #[error("line {line} of the accent table needs at least a key and a base: {text:?}")]
    MissingBase { line: usize, text: String },

    #[error("line {line} of the accent table has an escape that is not a character: {escape:?}")]
    InvalidEscape { line: usize, escape: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiacriticEntry {
    pub key: String,
    pub base: String,
    pub alternatives: Vec<String>,
}

/// Entries in file order. Translation applies them in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiacriticTable {
    entries: Vec<DiacriticEntry>,
}

impl DiacriticTable {
    pub fn parse(text: &str) -> Result<Self, DiacriticsError> {
        let mut entries = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let mut fields = raw.split_whitespace();
            let Some(key) = fields.next() else {
                continue;
            };
            let base = fields.next().ok_or_else(|| DiacriticsError::MissingBase {
                line,
                text: raw.to_string(),
            })?;
            let alternatives = fields
                .map(|field| decode_escapes(field, line))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push(DiacriticEntry {
                key: key.to_string(),
                base: base.to_string(),
                alternatives,
            });
        }
        Ok(Self { entries })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| DryError::io(path, e))?;
        let table = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), entries = table.len(), "loaded accent table");
        Ok(table)
    }

    pub fn entries(&self) -> &[DiacriticEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every alternative with its key, or with its base when
    /// `to_base` is set (keys then become their base too).
    pub fn translate(&self, text: &str, to_base: bool) -> String {
        let mut text = text.to_string();
        for entry in &self.entries {
            let target = if to_base {
                text = text.replace(&entry.key, &entry.base);
                &entry.base
            } else {
                &entry.key
            };
            for alternative in entry.alternatives.iter().filter(|a| !a.is_empty()) {
                text = text.replace(alternative.as_str(), target);
            }
        }
        text
    }
}

impl fmt::Display for DiacriticTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accented characters and sequences that are treated as equivalent:")?;
        for entry in &self.entries {
            writeln!(
                f,
                "{} (base: {}) <- {}",
                entry.key,
                entry.base,
                entry.alternatives.join(" , ")
            )?;
        }
        Ok(())
    }
}

fn decode_escapes(field: &str, line: usize) -> Result<String, DiacriticsError> {
    let mut invalid = None;
    let decoded = ESCAPE.replace_all(field, |caps: &Captures| {
        if caps.get(4).is_some() {
            return "\\".to_string();
        }
        let digits = (1..=3).find_map(|group| caps.get(group)).map_or("", |m| m.as_str());
        match u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
            Some(c) => c.to_string(),
            None => {
                invalid.get_or_insert_with(|| caps[0].to_string());
                String::new()
            }
        }
    });
    match invalid {
        Some(escape) => Err(DiacriticsError::InvalidEscape { line, escape }),
        None => Ok(decoded.into_owned()),
    }
}
