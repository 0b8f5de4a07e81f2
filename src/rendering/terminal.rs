//! Terminal size and paging.

use crate::error::DryError;
use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};

/// Used when `$PAGER` is unset. `-R` passes colors through.
pub const DEFAULT_PAGER: &str = "less -R";

/// Columns available for rendering: terminal width minus `right_margin`, or
/// `fallback` when stdout is not a terminal.
pub fn target_width(right_margin: usize, fallback: usize) -> usize {
    if !io::stdout().is_terminal() {
        return fallback;
    }
    match crossterm::terminal::size() {
        Ok((columns, _)) if columns > 0 => (columns as usize).saturating_sub(right_margin).max(1),
        Ok(_) => fallback,
        Err(e) => {
            tracing::debug!("could not read terminal size: {e}");
            fallback
        }
    }
}

/// Print `text` exactly as given, through `$PAGER` (default [`DEFAULT_PAGER`])
/// when `use_pager` is set and stdout is a terminal. A pager that cannot be
/// started falls back to plain output.
pub fn page(text: &str, use_pager: bool) -> Result<(), DryError> {
    if use_pager && io::stdout().is_terminal() {
        let pager = std::env::var("PAGER").unwrap_or_else(|_| DEFAULT_PAGER.to_string());
        if let Some((program, args)) = pager_command(&pager) {
            match Command::new(program)
                .args(args)
                .stdin(Stdio::piped())
                .spawn()
            {
                Ok(mut child) => {
                    if let Some(mut stdin) = child.stdin.take() {
                        // The user quitting the pager early closes the pipe.
                        if let Err(e) = stdin.write_all(text.as_bytes()) {
                            if e.kind() != io::ErrorKind::BrokenPipe {
                                return Err(DryError::io(program, e));
                            }
                        }
                    }
                    child.wait().map_err(|e| DryError::io(program, e))?;
                    return Ok(());
                }
                Err(e) => tracing::warn!("could not start pager {program:?}: {e}"),
            }
        }
    }

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .map_err(|e| DryError::io("<stdout>", e))?;
    stdout.flush().map_err(|e| DryError::io("<stdout>", e))
}

/// `"less -R"` -> (`less`, [`-R`])
fn pager_command(pager: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = pager.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pager_matches_documented_default() {
        assert_eq!(pager_command(DEFAULT_PAGER), Some(("less", vec!["-R"])));
        let defaults = include_str!("../../defaults/drybones.default.toml");
        assert!(defaults.contains(&format!("(default `{DEFAULT_PAGER}`)")));
        assert_eq!(pager_command("  "), None);
    }
}
