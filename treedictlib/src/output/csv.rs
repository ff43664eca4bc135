//! CSV export: one file per flattened table.

use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::options::ExportOptions;
use crate::table::Table;
use crate::tree::TreeMap;
use crate::Result;

use super::{target_path, write_file};

/// Quote a CSV field if it contains a separator, quote or line break.
pub fn csv_field(text: &str) -> Cow<'_, str> {
    if text.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}

/// File name for a table: `{stamp}_{name}.csv`.
///
/// Path separators in the name become `_`. Names longer than `max_len`
/// characters keep their first and last `max_len / 2` characters joined by
/// `___`.
pub fn csv_filename(name: &str, stamp: &str, max_len: usize) -> String {
    format!("{}.csv", csv_stem(name, stamp, max_len))
}

fn csv_stem(name: &str, stamp: &str, max_len: usize) -> String {
    let name: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();

    let count = name.chars().count();
    let name = if count > max_len {
        let keep = max_len / 2;
        let head: String = name.chars().take(keep).collect();
        let tail: String = name.chars().skip(count - keep).collect();
        format!("{head}___{tail}")
    } else {
        name
    };

    format!("{stamp}_{name}")
}

/// Write a single table as CSV.
pub fn write_csv<W: Write>(table: &Table, writer: &mut W) -> Result<()> {
    writer.write_all(table.to_csv().as_bytes())?;
    Ok(())
}

/// Flatten `tree` and write each table to its own file in `dir`.
///
/// Returns the written paths in table order. Tables whose names map to the
/// same file name get a `_2`, `_3`, ... suffix.
pub fn to_csv_files(
    tree: &TreeMap,
    dir: &Path,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    let tables = tree.to_tables_with(&options.flatten)?;
    let stamp = options.date_stamp();

    let mut used = HashSet::new();
    let mut paths = Vec::with_capacity(tables.len());
    for table in &tables {
        let stem = csv_stem(&table.name, &stamp, options.max_name_len);
        let mut filename = format!("{stem}.csv");
        let mut n = 2;
        while !used.insert(filename.clone()) {
            filename = format!("{stem}_{n}.csv");
            n += 1;
        }
        if n > 2 {
            warn!(table = %table.name, file = %filename, "file name already used, renamed");
        }

        let path = target_path(Some(dir), &filename)?;
        write_file(&path, |w| write_csv(table, w))?;
        paths.push(path);
    }

    Ok(paths)
}
