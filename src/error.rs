//! Loader errors.
//!
//! Every failure carries the file, table and line it happened on so the
//! operator can find the offending record without re-running the load.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur while preparing the schema or importing a file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Source file could not be opened.
    #[error("Opening source file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed delimited text, including rows with the wrong field count.
    #[error("Reading {path:?} at line {line}")]
    Csv {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// Field bytes are not valid in the configured input encoding.
    #[error("Failed to decode {path:?} at line {line} with encoding {encoding}")]
    Decode {
        path: PathBuf,
        line: u64,
        encoding: &'static str,
    },

    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),

    /// Header row does not name exactly the destination table's columns.
    #[error(
        "Header of {path:?} does not match table '{table}': missing {missing:?}, unexpected {unexpected:?}, duplicated {duplicated:?}"
    )]
    SchemaMismatch {
        path: PathBuf,
        table: &'static str,
        missing: Vec<String>,
        unexpected: Vec<String>,
        duplicated: Vec<String>,
    },

    /// Field could not be converted to the column's storage type.
    #[error(
        "Line {line} of {path:?}: column '{column}' of table '{table}' expects {expected} but found '{value}'"
    )]
    TypeMismatch {
        path: PathBuf,
        table: &'static str,
        line: u64,
        column: String,
        expected: &'static str,
        value: String,
    },

    /// Primary-key, foreign-key or other integrity rule rejected a row.
    #[error("Line {line} of {path:?} violates a constraint on table '{table}'")]
    Constraint {
        path: PathBuf,
        table: &'static str,
        line: u64,
        #[source]
        source: rusqlite::Error,
    },

    /// Storage engine rejected a row for a reason other than a constraint.
    #[error("Inserting line {line} of {path:?} into table '{table}'")]
    Insert {
        path: PathBuf,
        table: &'static str,
        line: u64,
        #[source]
        source: rusqlite::Error,
    },

    /// Any other storage failure outside of row insertion.
    #[error("Database error while {action}")]
    Database {
        action: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Progress output could not be written.
    #[error("Writing progress output")]
    Output(#[source] io::Error),
}

impl LoadError {
    pub(crate) fn database(action: impl Into<String>, source: rusqlite::Error) -> Self {
        LoadError::Database {
            action: action.into(),
            source,
        }
    }

    /// Returns true when the storage engine rejected a row on integrity grounds.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, LoadError::Constraint { .. })
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
