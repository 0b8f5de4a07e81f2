//! Column grouping
//!
//! Splits the aligned columns of a line into groups that each fit the terminal
//! width. Every group repeats the row labels, so each one starts from the same
//! fixed prefix cost. One greedy pass, no backtracking:
//!
//! ```text
//! running = prefix
//! for each column i:
//!     add column i (plus the between-column delimiter unless it opens the group)
//!     if running + delimiter + width(i + 1) > target: close the group
//! ```
//!
//! A column wider than the target on its own still gets a (singleton) group and
//! overflows; cells are never wrapped.

/// Ordered column indices shown together.
pub type ColumnGroup = Vec<usize>;

/// Width budget for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupBudget {
    /// Total display columns available.
    pub target_width: usize,
    /// Label column plus the after-label delimiter, paid once per group.
    pub prefix_width: usize,
    /// Delimiter between two adjacent columns.
    pub between_width: usize,
}

impl GroupBudget {
    /// Rendered width of `group` under this budget.
    pub fn group_width(&self, group: &[usize], widths: &[usize]) -> usize {
        let columns: usize = group.iter().map(|&i| widths[i]).sum();
        self.prefix_width + columns + self.between_width * group.len().saturating_sub(1)
    }
}

pub fn plan_column_groups(widths: &[usize], budget: &GroupBudget) -> Vec<ColumnGroup> {
    let mut groups = Vec::new();
    let mut current: ColumnGroup = Vec::new();
    let mut running = budget.prefix_width;

    for (i, &width) in widths.iter().enumerate() {
        if !current.is_empty() {
            running += budget.between_width;
        }
        current.push(i);
        running += width;

        if let Some(&next) = widths.get(i + 1) {
            if running + budget.between_width + next > budget.target_width {
                groups.push(std::mem::take(&mut current));
                running = budget.prefix_width;
            }
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }
    groups
}
