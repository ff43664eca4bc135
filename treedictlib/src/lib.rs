//! # treedictlib
//!
//! Tree dictionaries keyed by tuples of labels, flattened into tables for
//! reporting.
//!
//! ## Overview
//!
//! Nested result data (experiment outputs keyed by run, metric, statistic,
//! ...) is naturally a tree, but reports want tables. A [`TreeMap`] stores
//! values under [`Key`]s of any length and answers prefix lookups with
//! sub-trees. Flattening walks every prefix and turns each group of keys
//! that continues exactly two more levels into a row/column [`Table`].
//!
//! The pipeline:
//!
//! 1. **Build**: [`TreeMap::from_entries`] or [`TreeMap::from_nested`] (JSON)
//! 2. **Query**: [`TreeMap::get`] returns a [`Node`], either a leaf value or
//!    the sub-tree under a prefix
//! 3. **Flatten**: [`TreeMap::to_tables`] produces the `Properties` table
//!    (top-level scalars) and one value table per two-level grouping
//! 4. **Export**: [`output`] writes HTML pages and CSV files
//!
//! ## Example
//!
//! ```rust
//! use treedictlib::{Scalar, TreeMap};
//!
//! let tree = TreeMap::from_json_str(r#"{
//!     "host": "ci-01",
//!     "run1": {"cpu": 0.52, "mem": 310},
//!     "run2": {"cpu": 0.48, "mem": 295}
//! }"#).unwrap();
//!
//! let tables = tree.to_tables().unwrap();
//! assert_eq!(tables[0].name, "Properties");
//! assert_eq!(tables[0].get("", "host"), Some(&Scalar::from("ci-01")));
//!
//! let runs = &tables[1];
//! assert_eq!(runs.rows(), ["run1", "run2"]);
//! assert_eq!(runs.get("run2", "mem"), Some(&Scalar::Int(295)));
//!
//! print!("{}", tree.pretty());
//! ```

pub mod error;
mod flatten;
pub mod key;
pub mod options;
pub mod output;
pub mod scalar;
pub mod table;
pub mod tree;

pub use error::TreeDictError;
pub use key::Key;
pub use options::{ExportOptions, FlattenOptions, PROPERTIES_TABLE_NAME};
pub use scalar::Scalar;
pub use table::{sort_by_name, Cell, Table};
pub use tree::{Node, TreeMap};

/// Result type for treedictlib operations
pub type Result<T> = std::result::Result<T, TreeDictError>;
