//! Tabular line data model
//!
//! A file is a sequence of [`Line`]s. Each line holds [`Row`]s, each row holds
//! [`Cell`]s, and each cell holds one or more morpheme strings:
//!
//! ```text
//! ┌------------┐
//! N: Kaikai 12            <- designation row (synthesized, not stored as a row)
//! Baseline: kati anu      <- aligned row, 2 cells
//! Parse: kat-i anu        <- aligned row, cell 0 has morphemes ["kat", "i"]
//! Translation: the dog ran   <- unaligned row, exactly 1 cell
//! └------------┘
//! ```
//!
//! All values are immutable once built. Editing collaborators construct
//! replacement rows and lines instead of mutating in place.

pub mod cell;
pub mod designation;
pub mod document;
pub mod line;
pub mod residue;
pub mod row;
pub mod row_label;

pub use cell::Cell;
pub use designation::Designation;
pub use document::{LinesAndResidues, ParsedLine};
pub use line::Line;
pub use residue::{ResidueLocation, ResidueMap};
pub use row::Row;
pub use row_label::{InvalidLabel, LabelTable, RowLabel};
