//! Normalizing accent spellings across a file.
//!
//! Every morpheme of every row goes through the project's accent table.
//! Designations and residues are left as written.

use super::session::FileEditSession;
use crate::diacritics::DiacriticTable;
use crate::error::DryError;
use crate::model::{Cell, Line, Row};

/// Translate one line; `None` when nothing in it changes.
pub fn convert_line(line: &Line, table: &DiacriticTable, to_base: bool) -> Result<Option<Line>, DryError> {
    let mut changed = false;
    let mut rows = Vec::with_capacity(line.len());
    for row in line {
        let cells: Vec<Cell> = row
            .cells()
            .iter()
            .map(|cell| {
                Cell::new(
                    cell.morphemes()
                        .iter()
                        .map(|morpheme| table.translate(morpheme, to_base))
                        .collect(),
                )
            })
            .collect();
        changed |= cells.as_slice() != row.cells();
        rows.push(Row::new(row.label().clone(), cells)?);
    }
    if !changed {
        return Ok(None);
    }
    Ok(Some(Line::new(line.designation().clone(), rows)?))
}

/// Apply `table` to every line of the session. Returns how many lines changed.
pub fn convert_session(session: &mut FileEditSession, table: &DiacriticTable, to_base: bool) -> Result<usize, DryError> {
    let converted: Vec<Line> = session
        .lines()
        .filter_map(|line| convert_line(line, table, to_base).transpose())
        .collect::<Result<_, _>>()?;
    let changed = converted.len();
    for line in converted {
        session.replace(line)?;
    }
    tracing::debug!(lines = changed, to_base, "converted accents");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::line_from_body;

    fn table() -> DiacriticTable {
        DiacriticTable::parse("é e e'\n").unwrap()
    }

    #[test]
    fn test_convert_line_keeps_cells_and_designation() {
        let line = line_from_body("N: Be'e 1\nBaseline: kate'-i anu\nGloss: dog-NOM run\nTranslation: the dog's run");
        let converted = convert_line(&line, &table(), false).unwrap().unwrap();
        assert_eq!(converted.designation().as_str(), "Be'e 1");
        let baseline = converted.get_by_name("Baseline").unwrap();
        assert_eq!(baseline.content(), "katé-i anu");
        assert_eq!(baseline.cells()[0].morphemes(), ["katé", "i"]);
        assert_eq!(converted.get_by_name("Gloss").unwrap(), line.get_by_name("Gloss").unwrap());
        assert_eq!(converted.get_by_name("Translation").unwrap().content(), "the dog's run");
    }

    #[test]
    fn test_unchanged_line_is_none() {
        let line = line_from_body("N: A 1\nBaseline: kati anu");
        assert!(convert_line(&line, &table(), false).unwrap().is_none());
        let accented = line_from_body("N: A 1\nBaseline: katé anu");
        let based = convert_line(&accented, &table(), true).unwrap().unwrap();
        assert_eq!(based.get_by_name("Baseline").unwrap().content(), "kate anu");
    }
}
