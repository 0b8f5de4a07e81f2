//! Searching row contents
//!
//! Matches a literal string or a regular expression against the text of each
//! row (the row as written in the file, cells joined by spaces). Searches the
//! labels themselves are not supported; pick rows by label with `label`.

use crate::error::DryError;
use crate::model::{Designation, Line};
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone)]
pub enum Query {
    Literal(String),
    Regex(Regex),
}

impl Query {
    pub fn literal(text: impl Into<String>) -> Self {
        Query::Literal(text.into())
    }

    pub fn regex(pattern: &str) -> Result<Self, DryError> {
        Ok(Query::Regex(Regex::new(pattern)?))
    }

    /// Byte spans of every non-overlapping match in `haystack`.
    pub fn find_spans(&self, haystack: &str) -> Vec<(usize, usize)> {
        match self {
            Query::Literal(needle) if needle.is_empty() => Vec::new(),
            Query::Literal(needle) => haystack
                .match_indices(needle.as_str())
                .map(|(start, matched)| (start, start + matched.len()))
                .collect(),
            Query::Regex(regex) => regex
                .find_iter(haystack)
                .filter(|m| !m.is_empty())
                .map(|m| (m.start(), m.end()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub designation: Designation,
    pub label: String,
    pub matched: String,
    /// Byte range of the match within `row_text`.
    pub span: (usize, usize),
    pub row_text: String,
}

/// All matches of `query` in `lines`, in order, restricted to rows named
/// `label` if given.
pub fn search_lines<'a>(
    lines: impl IntoIterator<Item = &'a Line>,
    query: &Query,
    label: Option<&str>,
) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for line in lines {
        for row in line {
            if label.is_some_and(|label| row.label().name() != label) {
                continue;
            }
            let row_text = row.content();
            for (start, end) in query.find_spans(&row_text) {
                hits.push(SearchHit {
                    designation: line.designation().clone(),
                    label: row.label().name().to_string(),
                    matched: row_text[start..end].to_string(),
                    span: (start, end),
                    row_text: row_text.clone(),
                });
            }
        }
    }
    tracing::debug!(hits = hits.len(), "search finished");
    hits
}
