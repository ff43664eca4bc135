//! Template contexts for CLI output rendered by outstanding

use console::Style;
use serde::Serialize;
use std::path::PathBuf;
use treedictlib::{Key, Scalar, Table, TreeMap};

/// Include templates at compile time
pub const TABLES_TEMPLATE: &str = include_str!("../templates/tables.jinja");
pub const TREE_TEMPLATE: &str = include_str!("../templates/tree.jinja");
pub const PATHS_TEMPLATE: &str = include_str!("../templates/paths.jinja");

/// Table data for template rendering (pre-formatted)
#[derive(Debug, Serialize)]
struct TemplateTable {
    /// Table name, styled
    title: String,
    /// Pre-padded column header line
    header: String,
    /// Separator line (dashes)
    separator: String,
    /// Pre-padded data lines
    rows: Vec<String>,
}

/// Data context for the tables template
#[derive(Debug, Serialize)]
pub struct TablesContext {
    tables: Vec<TemplateTable>,
}

/// Data context for the tree template
#[derive(Debug, Serialize)]
pub struct TreeContext {
    lines: Vec<String>,
}

/// One stored entry, as emitted in JSON mode
#[derive(Debug, Serialize)]
pub struct TreeEntry<'a> {
    key: &'a Key,
    value: &'a Scalar,
}

/// Data context listing written files
#[derive(Debug, Serialize)]
pub struct PathsContext {
    paths: Vec<String>,
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

/// Lay out one table: row labels left-aligned, cells right-aligned, each
/// column as wide as its widest entry.
fn to_template_table(table: &Table, title_style: &Style) -> TemplateTable {
    let label_width = table
        .rows()
        .iter()
        .map(|r| display_width(r))
        .max()
        .unwrap_or(0);

    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            table
                .row_values(row)
                .into_iter()
                .map(|v| v.map(ToString::to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| display_width(&row[i]))
                .chain(std::iter::once(display_width(column)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |label: &str, values: &[String]| -> String {
        let mut line = format!("{:<width$}", label, width = label_width);
        for (value, width) in values.iter().zip(&widths) {
            line.push_str(&format!("  {:>width$}", value, width = *width));
        }
        line.trim_end().to_string()
    };

    let header = format_line("", table.columns());
    let separator = "-".repeat(label_width + widths.iter().map(|w| w + 2).sum::<usize>());
    let rows = table
        .rows()
        .iter()
        .zip(&cells)
        .map(|(label, values)| format_line(label.as_str(), values.as_slice()))
        .collect();

    TemplateTable {
        title: title_style.apply_to(&table.name).to_string(),
        header,
        separator,
        rows,
    }
}

/// Build the context for [`TABLES_TEMPLATE`]
pub fn tables_context(tables: &[Table]) -> TablesContext {
    let title_style = Style::new().bold();
    TablesContext {
        tables: tables
            .iter()
            .map(|t| to_template_table(t, &title_style))
            .collect(),
    }
}

/// Build the context for [`TREE_TEMPLATE`]
pub fn tree_context(tree: &TreeMap) -> TreeContext {
    TreeContext {
        lines: tree.pretty().lines().map(str::to_string).collect(),
    }
}

/// Stored entries in key order
pub fn tree_entries(tree: &TreeMap) -> Vec<TreeEntry<'_>> {
    tree.iter()
        .map(|(key, value)| TreeEntry { key, value })
        .collect()
}

/// Build the context for [`PATHS_TEMPLATE`]
pub fn paths_context(paths: &[PathBuf]) -> PathsContext {
    PathsContext {
        paths: paths.iter().map(|p| p.display().to_string()).collect(),
    }
}
