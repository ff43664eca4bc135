//! Two-level tables produced by flattening a tree.
//!
//! A [`Table`] is a named grid addressed by `(row, column)` labels. Row and
//! column labels are kept in order of first appearance until [`Table::sort`]
//! orders them lexicographically. Tables know how to serialize themselves to
//! HTML and CSV; the exporters in [`crate::output`] only arrange and write
//! them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::output::csv::csv_field;
use crate::output::html::escape_html;
use crate::scalar::Scalar;

/// A single populated cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: String,
    pub column: String,
    pub value: Scalar,
}

/// A named 2-D table of scalar values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TableData")]
pub struct Table {
    /// Table title, used for HTML captions, CSV headers and file names
    pub name: String,
    rows: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Cell>,
    /// Position of each `(row, column)` in `cells`
    #[serde(skip)]
    index: BTreeMap<(String, String), usize>,
}

/// Serialized form of [`Table`], without the cell index.
#[derive(Deserialize)]
struct TableData {
    name: String,
    rows: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Cell>,
}

impl From<TableData> for Table {
    fn from(data: TableData) -> Self {
        let mut table = Self {
            name: data.name,
            rows: data.rows,
            columns: data.columns,
            cells: data.cells,
            index: BTreeMap::new(),
        };
        table.reindex();
        table
    }
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the cell at `(row, column)`, replacing any previous value.
    pub fn append(
        &mut self,
        row: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<Scalar>,
    ) {
        let row = row.into();
        let column = column.into();
        let value = value.into();

        let slot = (row, column);
        if let Some(&i) = self.index.get(&slot) {
            self.cells[i].value = value;
            return;
        }

        let (row, column) = slot;
        if !self.rows.contains(&row) {
            self.rows.push(row.clone());
        }
        if !self.columns.contains(&column) {
            self.columns.push(column.clone());
        }
        self.index.insert((row.clone(), column.clone()), self.cells.len());
        self.cells.push(Cell { row, column, value });
    }

    fn reindex(&mut self) {
        self.index = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| ((c.row.clone(), c.column.clone()), i))
            .collect();
    }

    /// Order rows, columns and cells lexicographically by label.
    pub fn sort(&mut self) -> &mut Self {
        self.rows.sort();
        self.columns.sort();
        self.cells
            .sort_by(|a, b| (&a.row, &a.column).cmp(&(&b.row, &b.column)));
        self.reindex();
        self
    }

    /// Consuming variant of [`Table::sort`].
    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, row: &str, column: &str) -> Option<&Scalar> {
        self.index
            .get(&(row.to_string(), column.to_string()))
            .map(|&i| &self.cells[i].value)
    }

    /// The values of `row` in column order, `None` where no cell is set.
    pub fn row_values(&self, row: &str) -> Vec<Option<&Scalar>> {
        self.columns.iter().map(|column| self.get(row, column)).collect()
    }

    /// Render as an HTML `<table>` with the name as caption.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table class=\"treedict\">\n");
        html.push_str(&format!("<caption>{}</caption>\n", escape_html(&self.name)));

        html.push_str("<tr><th></th>");
        for column in &self.columns {
            html.push_str(&format!("<th>{}</th>", escape_html(column)));
        }
        html.push_str("</tr>\n");

        for row in &self.rows {
            html.push_str(&format!("<tr><th>{}</th>", escape_html(row)));
            for value in self.row_values(row) {
                let text = value.map(ToString::to_string).unwrap_or_default();
                html.push_str(&format!("<td>{}</td>", escape_html(&text)));
            }
            html.push_str("</tr>\n");
        }

        html.push_str("</table>");
        html
    }

    /// Render as CSV: a header line (name, then column labels) followed by
    /// one line per row.
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&csv_field(&self.name));
        for column in &self.columns {
            output.push(',');
            output.push_str(&csv_field(column));
        }
        output.push('\n');

        for row in &self.rows {
            output.push_str(&csv_field(row));
            for value in self.row_values(row) {
                output.push(',');
                if let Some(value) = value {
                    output.push_str(&csv_field(&value.to_string()));
                }
            }
            output.push('\n');
        }

        output
    }
}

/// Sort tables by name, the order exporters emit them in.
pub fn sort_by_name(tables: &mut [Table]) {
    tables.sort_by(|a, b| a.name.cmp(&b.name));
}
