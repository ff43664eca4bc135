//! Error types for treedictlib

use std::path::PathBuf;
use thiserror::Error;

use crate::key::Key;

/// Errors that can occur while querying, flattening or exporting a tree
#[derive(Error, Debug)]
pub enum TreeDictError {
    /// No stored key equals or starts with the lookup key
    #[error("key not found: ({0})")]
    KeyNotFound(Key),

    /// Flattening requires at least one key
    #[error("cannot build tables from an empty tree")]
    EmptyTree,

    /// The empty key can be used for lookups but not stored
    #[error("cannot store a value under the empty key")]
    EmptyKey,

    /// Nested input could not be turned into a tree
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// HTML template lacks the header/footer separator
    #[error("template has no #SPLIT# marker")]
    MissingSplitMarker,

    /// Failed to write an output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
