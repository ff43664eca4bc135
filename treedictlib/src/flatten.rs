//! Flattening a tree into two-level tables.
//!
//! Every group of keys that share a prefix and continue exactly two more
//! levels forms a grid: the first remaining label is the row, the second the
//! column. [`TreeMap::to_tables`] finds all such grids at every depth, plus
//! one table holding the top-level scalars.

use tracing::debug;

use crate::error::TreeDictError;
use crate::key::Key;
use crate::options::FlattenOptions;
use crate::table::Table;
use crate::tree::{Node, TreeMap};
use crate::Result;

impl TreeMap {
    /// Tables from the two shallowest levels of this tree.
    ///
    /// Returns `(properties, values)`, both named `name` and sorted:
    /// - `properties`: every length-1 key `(k,)` as a cell in row `""`,
    ///   column `k`
    /// - `values`: every length-2 key `(k0, k1)` as the cell at row `k0`,
    ///   column `k1`
    ///
    /// Deeper keys are ignored.
    pub fn toplevel_tables(&self, name: &str) -> (Table, Table) {
        let mut properties = Table::new(name);
        let mut values = Table::new(name);

        for (key, value) in self.iter() {
            match key.labels() {
                [k] => properties.append("", k.as_str(), value.clone()),
                [k0, k1] => values.append(k0.as_str(), k1.as_str(), value.clone()),
                _ => {}
            }
        }

        (properties.sorted(), values.sorted())
    }

    /// Flatten the whole tree with default table names.
    ///
    /// See [`TreeMap::to_tables_with`].
    pub fn to_tables(&self) -> Result<Vec<Table>> {
        self.to_tables_with(&FlattenOptions::default())
    }

    /// Flatten the whole tree into tables.
    ///
    /// For each depth `i` below the longest key, and each distinct length-`i`
    /// prefix in sorted order, the sub-tree under that prefix contributes its
    /// [`toplevel_tables`](TreeMap::toplevel_tables):
    /// - the property table only at depth 0, renamed to
    ///   `options.properties_name`
    /// - the value table at every depth, named after the prefix
    ///
    /// Empty tables are dropped. A prefix that is itself a stored key
    /// resolves to a leaf and contributes nothing.
    ///
    /// Fails with [`TreeDictError::EmptyTree`] when the tree has no keys.
    pub fn to_tables_with(&self, options: &FlattenOptions) -> Result<Vec<Table>> {
        if self.is_empty() {
            return Err(TreeDictError::EmptyTree);
        }

        let max_depth = self.max_depth();
        let mut tables = Vec::new();

        for depth in 0..max_depth {
            let prefixes = self.prefixes(depth);
            debug!(depth, prefixes = prefixes.len(), "flattening level");

            for prefix in prefixes {
                let Node::Tree(sub) = self.get(&prefix)? else {
                    continue;
                };

                let name = options.table_name(&prefix);
                let (mut properties, values) = sub.toplevel_tables(&name);
                if depth == 0 && !properties.is_empty() {
                    properties.name = options.properties_name.clone();
                    tables.push(properties);
                }
                if !values.is_empty() {
                    tables.push(values);
                }
            }
        }

        debug!(tables = tables.len(), "flattened tree");
        Ok(tables)
    }

    /// Tables for the sub-tree under `prefix`, named after it.
    pub fn tables_at(
        &self,
        prefix: impl Into<Key>,
        options: &FlattenOptions,
    ) -> Result<(Table, Table)> {
        let prefix = prefix.into();
        let sub = self.subtree(&prefix)?;
        Ok(sub.toplevel_tables(&options.table_name(&prefix)))
    }
}
