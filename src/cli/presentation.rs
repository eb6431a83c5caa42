//! Presentation: change set formatters.

use crate::error::SyncError;
use crate::types::FileChanges;
use owo_colors::OwoColorize;

pub fn format_changes_text(changes: &FileChanges, color: bool) -> String {
    if changes.is_empty() {
        return "No changes.".to_string();
    }

    let mut lines = Vec::with_capacity(changes.len() + 1);
    lines.push(format!(
        "{} changed ({} added, {} removed, {} modified):",
        changes.len(),
        changes.added.len(),
        changes.removed.len(),
        changes.modified.len()
    ));

    for path in &changes.added {
        lines.push(marker_line("+", path, color, |s| s.green().to_string()));
    }
    for path in &changes.removed {
        lines.push(marker_line("-", path, color, |s| s.red().to_string()));
    }
    for path in &changes.modified {
        lines.push(marker_line("~", path, color, |s| s.yellow().to_string()));
    }

    lines.join("\n")
}

fn marker_line(marker: &str, path: &str, color: bool, paint: impl Fn(&str) -> String) -> String {
    let line = format!("  {} {}", marker, path);
    if color {
        paint(&line)
    } else {
        line
    }
}

pub fn format_changes_json(changes: &FileChanges) -> Result<String, SyncError> {
    Ok(serde_json::to_string_pretty(changes)?)
}
