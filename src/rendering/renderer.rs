//! Line rendering
//!
//! Lays a [`Line`] out as terminal text. Labels are left-justified to the widest
//! `label:` of the line; aligned cells are padded to their column's display
//! width; unaligned rows are printed whole in every column group.
//!
//! ```text
//! N:        Kaikai 1
//! Baseline: kati | anu
//! Gloss:    dog  | run
//! - - - - - - - -
//! ...
//! ```

use super::planner::{plan_column_groups, ColumnGroup, GroupBudget};
use super::width::{display_width, pad_to_width};
use crate::config::DisplayConfig;
use crate::model::{Line, Row, RowLabel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub target_width: usize,
    pub after_label_delimiter: String,
    pub column_delimiter: String,
    pub group_separator: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target_width: 80,
            after_label_delimiter: " ".to_string(),
            column_delimiter: " | ".to_string(),
            group_separator: "- - - - - - - -".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn from_config(display: &DisplayConfig, target_width: usize) -> Self {
        Self {
            target_width,
            after_label_delimiter: display.after_label_delimiter.clone(),
            column_delimiter: display.column_delimiter.clone(),
            group_separator: display.group_separator.clone(),
        }
    }

    pub fn with_target_width(mut self, target_width: usize) -> Self {
        self.target_width = target_width;
        self
    }
}

pub struct LineRenderer<'a> {
    options: &'a RenderOptions,
}

impl<'a> LineRenderer<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self { options }
    }

    /// Widest `label:` in the line, the designation row included.
    pub fn label_width(&self, line: &Line) -> usize {
        line.labels()
            .map(|label| display_width(&label.with_separator()))
            .chain(std::iter::once(display_width(&designation_label())))
            .max()
            .unwrap_or(0)
    }

    /// Max display width of each aligned column.
    pub fn column_widths(&self, line: &Line) -> Vec<usize> {
        let columns = line.aligned_len().unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in line.iter().filter(|row| row.is_aligned()) {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(display_width(cell.text()));
            }
        }
        widths
    }

    pub fn budget(&self, line: &Line) -> GroupBudget {
        GroupBudget {
            target_width: self.options.target_width,
            prefix_width: self.label_width(line)
                + display_width(&self.options.after_label_delimiter),
            between_width: display_width(&self.options.column_delimiter),
        }
    }

    pub fn plan(&self, line: &Line) -> Vec<ColumnGroup> {
        plan_column_groups(&self.column_widths(line), &self.budget(line))
    }

    pub fn render(&self, line: &Line) -> Vec<String> {
        self.render_with_groups(line, &self.plan(line))
    }

    /// Render with an already computed grouping.
    pub fn render_with_groups(&self, line: &Line, groups: &[ColumnGroup]) -> Vec<String> {
        let label_width = self.label_width(line);
        let widths = self.column_widths(line);
        let mut out = vec![self.prefixed(
            &designation_label(),
            label_width,
            line.designation().as_str(),
        )];

        // A line without aligned rows still shows its free text once.
        let no_columns: [ColumnGroup; 1] = [Vec::new()];
        let groups = if groups.is_empty() { &no_columns[..] } else { groups };

        for (index, group) in groups.iter().enumerate() {
            if index > 0 {
                out.push(self.options.group_separator.clone());
            }
            for row in line {
                let content = if row.is_aligned() {
                    self.aligned_content(row, group, &widths)
                } else {
                    row.content()
                };
                out.push(self.prefixed(&row.label().with_separator(), label_width, &content));
            }
        }
        out
    }

    fn aligned_content(&self, row: &Row, group: &[usize], widths: &[usize]) -> String {
        group
            .iter()
            .map(|&column| {
                let text = row.cell(column).map_or("", |cell| cell.text());
                pad_to_width(text, widths[column])
            })
            .collect::<Vec<_>>()
            .join(&self.options.column_delimiter)
    }

    fn prefixed(&self, label: &str, label_width: usize, content: &str) -> String {
        let row = format!(
            "{}{}{}",
            pad_to_width(label, label_width),
            self.options.after_label_delimiter,
            content
        );
        row.trim_end().to_string()
    }
}

fn designation_label() -> String {
    format!("{}{}", RowLabel::DESIGNATION, RowLabel::SEPARATOR)
}

pub fn render_line(line: &Line, options: &RenderOptions) -> Vec<String> {
    LineRenderer::new(options).render(line)
}

/// Several lines, blank line between each.
pub fn render_lines<'a>(lines: impl IntoIterator<Item = &'a Line>, options: &RenderOptions) -> String {
    let renderer = LineRenderer::new(options);
    lines
        .into_iter()
        .map(|line| renderer.render(line).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
