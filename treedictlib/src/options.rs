//! Configuration for flattening and exporting.
//!
//! Both option types follow the same builder pattern: start from `new()` (or
//! `Default`) and chain `with_*` setters.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::key::Key;

/// Name given to the table of top-level scalar properties.
pub const PROPERTIES_TABLE_NAME: &str = "Properties";

/// Controls how flattened tables are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenOptions {
    /// Prepended to every per-prefix table name
    pub title_prefix: String,
    /// Placed between prefix labels in table names
    pub separator: String,
    /// Name of the top-level property table
    pub properties_name: String,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            title_prefix: "Table: ".to_string(),
            separator: "|".to_string(),
            properties_name: PROPERTIES_TABLE_NAME.to_string(),
        }
    }
}

impl FlattenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.title_prefix = prefix.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_properties_name(mut self, name: impl Into<String>) -> Self {
        self.properties_name = name.into();
        self
    }

    /// Table name for the tables found under `prefix`.
    pub fn table_name(&self, prefix: &Key) -> String {
        format!("{}{}", self.title_prefix, prefix.join(&self.separator))
    }
}

/// Options for file exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Table naming
    pub flatten: FlattenOptions,
    /// Date stamped onto CSV file names (today if unset)
    pub date: Option<NaiveDate>,
    /// Table names longer than this are shortened in file names
    pub max_name_len: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            flatten: FlattenOptions::default(),
            date: None,
            max_name_len: 200,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flatten(mut self, flatten: FlattenOptions) -> Self {
        self.flatten = flatten;
        self
    }

    /// Pin the date used in file names.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len;
        self
    }

    /// The file name date stamp, `YYYYMMDD`.
    pub fn date_stamp(&self) -> String {
        self.date
            .unwrap_or_else(|| Local::now().date_naive())
            .format("%Y%m%d")
            .to_string()
    }
}
