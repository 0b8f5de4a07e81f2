//! Output format registry
//!
//! Each output format implements [`Formatter`] and is registered by name with a
//! [`FormatRegistry`]. The CLI's `--format` flag looks formats up here.

use super::document::compose_unchanged;
use crate::model::{Line, LinesAndResidues};
use crate::rendering::{render_lines, RenderOptions};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),
    #[error("serialization error: {0}")]
    SerializationError(String),
}

pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "dry", "json")
    fn name(&self) -> &str;

    fn serialize(&self, document: &LinesAndResidues) -> Result<String, OutputError>;

    fn description(&self) -> &str {
        ""
    }
}

pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any with the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn serialize(&self, document: &LinesAndResidues, format: &str) -> Result<String, OutputError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| OutputError::FormatNotFound(format.to_string()))?;
        formatter.serialize(document)
    }

    /// All format names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registry with the built-in formats; `pretty` uses `render_options`.
    pub fn with_render_options(render_options: RenderOptions) -> Self {
        let mut registry = Self::new();
        registry.register(DryFormatter);
        registry.register(JsonFormatter);
        registry.register(PrettyFormatter(render_options));
        registry
    }

    pub fn with_defaults() -> Self {
        Self::with_render_options(RenderOptions::default())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The file format itself, residues included.
pub struct DryFormatter;

impl Formatter for DryFormatter {
    fn name(&self) -> &str {
        "dry"
    }

    fn serialize(&self, document: &LinesAndResidues) -> Result<String, OutputError> {
        compose_unchanged(document).map_err(|e| OutputError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Line groups with residues, byte-identical to the input"
    }
}

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonDocument<'a> {
    lines: Vec<&'a Line>,
    residues: Vec<JsonResidue<'a>>,
}

#[derive(Serialize)]
struct JsonResidue<'a> {
    location: String,
    text: &'a str,
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, document: &LinesAndResidues) -> Result<String, OutputError> {
        let json = JsonDocument {
            lines: document.iter_lines().collect(),
            residues: document
                .residues
                .iter()
                .map(|(location, text)| JsonResidue {
                    location: location.to_string(),
                    text,
                })
                .collect(),
        };
        serde_json::to_string_pretty(&json).map_err(|e| OutputError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Lines, rows and cells as JSON"
    }
}

/// Column-aligned terminal layout.
pub struct PrettyFormatter(pub RenderOptions);

impl Formatter for PrettyFormatter {
    fn name(&self) -> &str {
        "pretty"
    }

    fn serialize(&self, document: &LinesAndResidues) -> Result<String, OutputError> {
        Ok(render_lines(document.iter_lines(), &self.0))
    }

    fn description(&self) -> &str {
        "Aligned columns for reading in a terminal"
    }
}
