//! # drybones
//!
//! Interlinear text annotation files: multi-tier transcripts where every line
//! of source material carries parallel rows (baseline wordforms, morpheme
//! parses, glosses, free translations, ...).
//!
//! File Layout
//!
//! The crate is organized leaves first:
//!
//! src/
//!   ├── model        Cells, row labels, rows, lines and the parsed-file bundle
//!   ├── parsing      Line group splitting (with residue tracking) and line building
//!   ├── formats      Serialization of lines and whole documents back to text
//!   ├── editing      Read-modify-write sessions guarded by content fingerprints,
//!   │                plus the relabel, merge, wrap and accent collaborators
//!   ├── rendering    Display width, column grouping and the terminal renderer
//!   ├── search       String / regex search over row contents
//!   ├── project      Project directories and corpus discovery
//!   ├── diacritics   Per-project accent equivalence tables
//!   └── config       Layered configuration (embedded defaults + user file)
//!
//! The file format is lossless: anything outside a line group ("residue") is kept
//! by position, and line groups that were not edited are written back verbatim.
//! For test helpers, see the [testing module](crate::testing).

pub mod config;
pub mod diacritics;
pub mod editing;
pub mod error;
pub mod formats;
pub mod model;
pub mod parsing;
pub mod project;
pub mod rendering;
pub mod search;
pub mod testing;

pub use error::{Advisory, DryError, FormatError, InvariantViolation, PreconditionError};
pub use model::{Cell, Designation, Line, LinesAndResidues, ParsedLine, Row, RowLabel};
pub use parsing::{parse_document, ParseOptions};
