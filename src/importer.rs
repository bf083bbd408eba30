//! Streams one delimited source file into one destination table.
//!
//! The header row drives the column mapping: header names are used verbatim
//! as destination column names, so the importer works for any table whose
//! quoted column names match the extract. The header is checked against the
//! table before the first insert, and each file is loaded inside its own
//! transaction so a failing row leaves the table as it was.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use csv::ByteRecord;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};
use rusqlite::{Connection, ErrorCode, params_from_iter, types::Value};

use crate::{
    config::ConstraintMode,
    error::{LoadError, Result},
    io_utils,
    schema::{Column, SqlType, Table, insert_sql},
};

#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    pub mode: ConstraintMode,
    /// Overrides the extension-based delimiter when set.
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl ImportOptions {
    pub fn new(mode: ConstraintMode) -> Self {
        Self {
            mode,
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub table: Table,
    pub source: PathBuf,
    /// Data rows processed, header excluded.
    pub rows: u64,
}

/// Checks that `headers` name every loadable column of `table` exactly once.
///
/// Returns the destination columns in header order.
pub fn validate_headers(
    table: Table,
    headers: &[String],
    path: &Path,
) -> Result<Vec<&'static Column>> {
    let mut seen = HashSet::new();
    let mut duplicated = Vec::new();
    let mut unexpected = Vec::new();
    let mut columns = Vec::with_capacity(headers.len());

    for header in headers {
        if !seen.insert(header.as_str()) {
            duplicated.push(header.clone());
            continue;
        }
        match table.column(header) {
            Some(column) => columns.push(column),
            None => unexpected.push(header.clone()),
        }
    }
    let missing = table
        .columns()
        .iter()
        .filter(|column| !seen.contains(column.name))
        .map(|column| column.name.to_string())
        .collect::<Vec<_>>();

    if missing.is_empty() && unexpected.is_empty() && duplicated.is_empty() {
        Ok(columns)
    } else {
        Err(LoadError::SchemaMismatch {
            path: path.to_path_buf(),
            table: table.name(),
            missing,
            unexpected,
            duplicated,
        })
    }
}

/// Imports every data row of `path` into `table`, in file order.
///
/// All inserts run in a single transaction committed after the last row;
/// any error rolls the whole file back.
pub fn import_file(
    conn: &mut Connection,
    path: &Path,
    table: Table,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    debug!(
        "Importing {:?} into '{table}' (delimiter '{}', encoding {})",
        path,
        crate::printable_delimiter(delimiter),
        options.encoding.name()
    );
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, path, options.encoding)?;
    let columns = validate_headers(table, &headers, path)?;
    let sql = insert_sql(table, &headers, options.mode);
    debug!("{sql}");

    let tx = conn
        .transaction()
        .map_err(|e| LoadError::database(format!("starting import of '{table}'"), e))?;
    let mut rows = 0u64;
    {
        let mut statement = tx
            .prepare(&sql)
            .map_err(|e| LoadError::database(format!("preparing insert into '{table}'"), e))?;
        let mut record = ByteRecord::new();
        loop {
            match reader.read_byte_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(source) => {
                    let line = source
                        .position()
                        .map(|pos| pos.line())
                        .unwrap_or(rows + 2);
                    return Err(LoadError::Csv {
                        path: path.to_path_buf(),
                        line,
                        source,
                    });
                }
            }
            let line = record.position().map(|pos| pos.line()).unwrap_or(rows + 2);
            let fields =
                io_utils::decode_record(&record, options.encoding).ok_or_else(|| {
                    LoadError::Decode {
                        path: path.to_path_buf(),
                        line,
                        encoding: options.encoding.name(),
                    }
                })?;
            let values = bind_row(table, &columns, &fields, path, line)?;
            statement
                .execute(params_from_iter(values.iter()))
                .map_err(|source| insert_error(source, table, path, line))?;
            rows += 1;
        }
    }
    tx.commit()
        .map_err(|e| LoadError::database(format!("committing import of '{table}'"), e))?;

    info!("Imported {rows} row(s) from {:?} into '{table}'", path);
    Ok(ImportReport {
        table,
        source: path.to_path_buf(),
        rows,
    })
}

/// Converts decoded fields to storage values following each column's type.
fn bind_row(
    table: Table,
    columns: &[&'static Column],
    fields: &[String],
    path: &Path,
    line: u64,
) -> Result<Vec<Value>> {
    columns
        .iter()
        .zip(fields)
        .map(|(column, field)| match column.sql_type {
            SqlType::Text => Ok(Value::Text(field.clone())),
            SqlType::Integer => {
                let trimmed = field.trim();
                if trimmed.is_empty() {
                    return Ok(Value::Null);
                }
                trimmed
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| LoadError::TypeMismatch {
                        path: path.to_path_buf(),
                        table: table.name(),
                        line,
                        column: column.name.to_string(),
                        expected: SqlType::Integer.as_sql(),
                        value: field.clone(),
                    })
            }
        })
        .collect()
}

fn insert_error(source: rusqlite::Error, table: Table, path: &Path, line: u64) -> LoadError {
    let constraint = matches!(
        &source,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    );
    if constraint {
        LoadError::Constraint {
            path: path.to_path_buf(),
            table: table.name(),
            line,
            source,
        }
    } else {
        LoadError::Insert {
            path: path.to_path_buf(),
            table: table.name(),
            line,
            source,
        }
    }
}
