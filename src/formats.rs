//! Writing lines and documents back out
//!
//! - [`serializer`]: one line group at a time, the inverse of the line builder
//! - [`document`]: whole files, residues and untouched groups kept verbatim
//! - [`registry`]: named output formats for the CLI (`dry`, `json`, `pretty`)

pub mod document;
pub mod registry;
pub mod serializer;

pub use document::{compose_document, compose_lines, compose_unchanged};
pub use registry::{FormatRegistry, Formatter, OutputError};
pub use serializer::{line_body, row_to_string, serialize_line, serialize_lines};
