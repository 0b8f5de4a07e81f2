//! Terminal rendering of lines
//!
//! [`width`] measures text in display columns, [`planner`] splits a line's
//! aligned columns into groups that fit the terminal, and [`renderer`] prints the
//! groups. [`terminal`] holds the bits that touch the actual terminal.

pub mod planner;
pub mod renderer;
pub mod terminal;
pub mod width;

pub use planner::{plan_column_groups, ColumnGroup, GroupBudget};
pub use renderer::{render_line, render_lines, LineRenderer, RenderOptions};
pub use width::display_width;
