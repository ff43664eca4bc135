//! Exporters: write flattened tables and trees to HTML and CSV.
//!
//! This is the last stage of the pipeline. The core produces [`Table`]s;
//! the functions here arrange them and write them out:
//!
//! - **html**: a page of tables, or the tree as a collapsible accordion,
//!   spliced between the two halves of an [`HtmlTemplate`]
//! - **csv**: one dated file per table
//!
//! Writer-based functions (`write_*`) take any `io::Write`; the file-based
//! ones create the target directory first.
//!
//! ## Example
//!
//! ```rust,ignore
//! use treedictlib::output::{tables_to_html_file, HtmlTemplate};
//!
//! let template = HtmlTemplate::tables();
//! let path = tables_to_html_file(&tree, Some(out_dir), "report.html", &template, &options)?;
//! ```
//!
//! [`Table`]: crate::table::Table

pub mod csv;
pub mod html;

pub use csv::{csv_filename, to_csv_files, write_csv};
pub use html::{
    escape_html, render_tree_html, tables_to_html_file, tree_to_html_file, write_tables_html,
    write_tree_html, HtmlTemplate, SPLIT_MARKER,
};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::TreeDictError;
use crate::Result;

/// Resolve `filename` inside `dir`, creating the directory if needed.
pub(crate) fn target_path(dir: Option<&Path>, filename: &str) -> Result<PathBuf> {
    match dir {
        Some(dir) => {
            if !dir.is_dir() {
                fs::create_dir_all(dir)?;
            }
            Ok(dir.join(filename))
        }
        None => Ok(PathBuf::from(filename)),
    }
}

/// Create `path` and hand a buffered writer to `body`.
///
/// IO failures from `body` are reported as [`TreeDictError::FileWrite`] and the
/// partially written file is removed.
pub(crate) fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let to_file_error = |source: std::io::Error| TreeDictError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_file_error)?;
    let mut writer = BufWriter::new(file);
    let written = body(&mut writer).and_then(|()| Ok(writer.flush()?));
    if let Err(err) = written {
        drop(writer);
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "could not remove partial file");
        }
        return Err(match err {
            TreeDictError::Io(source) => to_file_error(source),
            other => other,
        });
    }

    info!(path = %path.display(), "wrote file");
    Ok(())
}
