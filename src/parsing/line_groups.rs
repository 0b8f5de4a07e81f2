//! Line group splitting
//!
//! Splits raw file text into line group bodies and the residue around them:
//!
//! ```text
//! residue₀ BEFORE body₀ AFTER residue₁ BEFORE body₁ AFTER residue₂ ...
//! ```
//!
//! Nothing here is fatal. Residue with visible characters and groups that never
//! close are reported as advisories; all text is kept so the file can be written
//! back byte for byte.

use crate::error::Advisory;
use crate::model::{ResidueLocation, ResidueMap};

/// Opens a line group.
pub const BEFORE_LINE: &str = "┌------------┐";
/// Closes a line group.
pub const AFTER_LINE: &str = "└------------┘";

const EXCERPT_CHARS: usize = 40;

/// One group body as found in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawGroup<'a> {
    pub body: &'a str,
    /// False when no AFTER delimiter followed the body.
    pub closed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineGroups<'a> {
    pub groups: Vec<RawGroup<'a>>,
    pub residues: ResidueMap,
    pub advisories: Vec<Advisory>,
}

pub fn split_line_groups(text: &str) -> LineGroups<'_> {
    let mut result = LineGroups::default();
    let mut chunks = text.split(BEFORE_LINE);

    // split always yields at least one chunk; the first one precedes every group
    if let Some(leading) = chunks.next() {
        if !leading.is_empty() {
            result.residues.insert(ResidueLocation::before(0), leading);
        }
    }

    for (index, chunk) in chunks.enumerate() {
        // Stray AFTER delimiters past the first one stay in the residue.
        match chunk.split_once(AFTER_LINE) {
            Some((body, trailing)) => {
                result.groups.push(RawGroup { body, closed: true });
                if !trailing.is_empty() {
                    result.residues.insert(ResidueLocation::after(index), trailing);
                }
            }
            None => {
                tracing::warn!(group = index, "line group has no closing delimiter");
                result.groups.push(RawGroup {
                    body: chunk,
                    closed: false,
                });
                result.advisories.push(Advisory::UnterminatedGroup { index });
            }
        }
    }

    let stray: Vec<Advisory> = result
        .residues
        .visible()
        .map(|(location, residue)| Advisory::StrayResidue {
            location,
            excerpt: excerpt(residue),
        })
        .collect();
    for advisory in &stray {
        tracing::warn!("{advisory}");
    }
    result.advisories.extend(stray);

    result
}

fn excerpt(residue: &str) -> String {
    let trimmed = residue.trim();
    let mut excerpt: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    if trimmed.chars().count() > EXCERPT_CHARS {
        excerpt.push('…');
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(body: &str) -> String {
        format!("{BEFORE_LINE}{body}{AFTER_LINE}")
    }

    #[test]
    fn test_no_groups_is_all_residue() {
        let groups = split_line_groups("just some notes\n");
        assert!(groups.groups.is_empty());
        assert_eq!(
            groups.residues.get(ResidueLocation::before(0)),
            "just some notes\n"
        );
        assert_eq!(groups.advisories.len(), 1);
    }

    #[test]
    fn test_empty_text() {
        let groups = split_line_groups("");
        assert!(groups.groups.is_empty());
        assert!(groups.residues.is_empty());
        assert!(groups.advisories.is_empty());
    }

    #[test]
    fn test_residues_are_keyed_by_gap() {
        let text = format!(
            "header\n{}\n\n{}\n",
            group("\nN: A 1\n"),
            group("\nN: A 2\n")
        );
        let groups = split_line_groups(&text);
        assert_eq!(groups.groups.len(), 2);
        assert_eq!(groups.groups[0].body, "\nN: A 1\n");
        assert!(groups.groups.iter().all(|g| g.closed));
        assert_eq!(groups.residues.get(ResidueLocation::before(0)), "header\n");
        assert_eq!(groups.residues.get(ResidueLocation::after(0)), "\n\n");
        assert_eq!(groups.residues.get(ResidueLocation::after(1)), "\n");
    }

    #[test]
    fn test_whitespace_residue_is_not_reported() {
        let text = format!("{}\n\n", group("\nN: A 1\n"));
        let groups = split_line_groups(&text);
        assert!(groups.advisories.is_empty());
    }

    #[test]
    fn test_visible_residue_is_reported() {
        let text = format!("{}\n% comment\n", group("\nN: A 1\n"));
        let groups = split_line_groups(&text);
        assert_eq!(
            groups.advisories,
            vec![Advisory::StrayResidue {
                location: ResidueLocation::after(0),
                excerpt: "% comment".to_string()
            }]
        );
    }

    #[test]
    fn test_stray_after_delimiters_stay_in_residue() {
        let text = format!("{}\n{AFTER_LINE}\n", group("\nN: A 1\n"));
        let groups = split_line_groups(&text);
        assert_eq!(groups.groups.len(), 1);
        assert_eq!(
            groups.residues.get(ResidueLocation::after(0)),
            format!("\n{AFTER_LINE}\n")
        );
    }

    #[test]
    fn test_unterminated_group() {
        let text = format!("{BEFORE_LINE}\nN: A 1\n");
        let groups = split_line_groups(&text);
        assert_eq!(groups.groups.len(), 1);
        assert!(!groups.groups[0].closed);
        assert_eq!(
            groups.advisories,
            vec![Advisory::UnterminatedGroup { index: 0 }]
        );
    }
}
