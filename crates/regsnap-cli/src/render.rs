//! Text rendering for the terminal.

use colored::Colorize;
use regsnap_diff::{DiffReport, NestedChange};
use regsnap_types::{Entry, TreeNode, Value, SEPARATOR};

const HEX_PREVIEW_BYTES: usize = 32;

/// The registry shows the unnamed value of a key as "(Default)".
fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(Default)"
    } else {
        name
    }
}

pub fn value_text(value: &Value) -> String {
    let body = match value {
        Value::Binary(data) | Value::Raw { data, .. } => hex_preview(data),
        other => other.to_string(),
    };
    format!("{body} ({})", value.kind().to_string().dimmed())
}

fn hex_preview(data: &[u8]) -> String {
    if data.is_empty() {
        return "<empty>".to_string();
    }
    if data.len() <= HEX_PREVIEW_BYTES {
        return hex::encode(data);
    }
    format!(
        "{}... ({} bytes)",
        hex::encode(&data[..HEX_PREVIEW_BYTES]),
        data.len()
    )
}

pub fn entry_text(entry: &Entry) -> String {
    match entry {
        Entry::Value(value) => value_text(value),
        Entry::Subtree(tree) => {
            let stats = tree.stats();
            format!("<key: {} subkeys, {} values>", stats.keys, stats.values)
        }
    }
}

pub fn stats_line(tree: &TreeNode) -> String {
    let stats = tree.stats();
    format!(
        "{} keys, {} values, depth {}",
        stats.keys, stats.values, stats.depth
    )
}

/// Indented listing of a whole tree below `root`.
pub fn tree_text(root: &str, tree: &TreeNode) -> String {
    let mut lines = vec![root.bold().to_string()];
    push_tree(tree, 1, &mut lines);
    lines.push(String::new());
    lines.join("\n")
}

fn push_tree(tree: &TreeNode, depth: usize, lines: &mut Vec<String>) {
    let pad = "  ".repeat(depth);
    for (name, entry) in tree.iter() {
        match entry {
            Entry::Value(value) => {
                lines.push(format!("{pad}{} = {}", display_name(name), value_text(value)));
            }
            Entry::Subtree(child) => {
                lines.push(format!("{pad}{}", format!("{name}{SEPARATOR}").cyan().bold()));
                push_tree(child, depth + 1, lines);
            }
        }
    }
}

pub fn report_text(report: &DiffReport, first: &str, second: &str) -> String {
    if report.is_empty() {
        return format!("{} No differences.\n", "✓".green().bold());
    }

    let mut lines = Vec::new();
    if !report.only_in_first.is_empty() {
        lines.push(format!("Only in {}:", first.bold()));
        for (name, entry) in report.only_in_first.iter() {
            lines.push(format!("  {} {}  {}", "-".red(), display_name(name), entry_text(entry)));
        }
    }
    if !report.only_in_second.is_empty() {
        lines.push(format!("Only in {}:", second.bold()));
        for (name, entry) in report.only_in_second.iter() {
            lines.push(format!("  {} {}  {}", "+".green(), display_name(name), entry_text(entry)));
        }
    }
    if !report.changed.is_empty() {
        lines.push("Changed:".to_string());
        for (name, change) in &report.changed {
            lines.push(format!(
                "  {} {}  {} -> {}",
                "~".yellow(),
                display_name(name),
                entry_text(&change.old),
                entry_text(&change.new)
            ));
        }
    }
    lines.push(format!(
        "{} removed, {} added, {} changed",
        report.removals(),
        report.additions(),
        report.modifications()
    ));
    lines.push(String::new());
    lines.join("\n")
}

pub fn nested_text(changes: &[NestedChange]) -> String {
    if changes.is_empty() {
        return format!("{} No differences.\n", "✓".green().bold());
    }

    let mut lines: Vec<String> = changes
        .iter()
        .map(|change| match change {
            NestedChange::Removed { path, entry } => {
                format!("{} {}  {}", "-".red(), path, entry_text(entry))
            }
            NestedChange::Added { path, entry } => {
                format!("{} {}  {}", "+".green(), path, entry_text(entry))
            }
            NestedChange::Modified { path, old, new } => format!(
                "{} {}  {} -> {}",
                "~".yellow(),
                path,
                entry_text(old),
                entry_text(new)
            ),
        })
        .collect();
    lines.push(format!("{} differences", changes.len()));
    lines.push(String::new());
    lines.join("\n")
}
