//! The full refresh pipeline: schema, imports, summary.

use std::{io::Write, path::PathBuf};

use log::{debug, info};
use rusqlite::Connection;

use crate::{
    config::{ConstraintMode, LoadConfig},
    error::{LoadError, Result},
    importer::{ImportOptions, ImportReport, import_file},
    schema::prepare_schema,
    summary::{TableCount, render_summary, summarize},
};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub database: PathBuf,
    pub mode: ConstraintMode,
    /// One entry per source file, in import order.
    pub imports: Vec<ImportReport>,
    pub counts: Vec<TableCount>,
}

impl LoadReport {
    pub fn count_for(&self, table: crate::schema::Table) -> Option<u64> {
        self.counts
            .iter()
            .find(|count| count.table == table)
            .map(|count| count.rows)
    }
}

pub struct Loader {
    config: LoadConfig,
}

impl Loader {
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Opens the destination database. SQLite only checks foreign keys when
    /// asked to, so enforcement is switched on per connection.
    pub fn open(&self) -> Result<Connection> {
        let path = &self.config.database;
        let conn = Connection::open(path)
            .map_err(|e| LoadError::database(format!("opening {path:?}"), e))?;
        conn.pragma_update(None, "foreign_keys", self.config.mode.enforces_keys())
            .map_err(|e| LoadError::database("configuring foreign key enforcement", e))?;
        debug!(
            "Opened {:?} (foreign keys {})",
            path,
            if self.config.mode.enforces_keys() { "on" } else { "off" }
        );
        Ok(conn)
    }

    /// Runs the whole load, writing operator progress lines to `out`.
    ///
    /// The connection is closed on every path. Files committed before a
    /// failing file stay committed; the failing file is rolled back and the
    /// summary is skipped.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<LoadReport> {
        let mut conn = self.open()?;
        let report = self.load(&mut conn, out)?;
        conn.close()
            .map_err(|(_, e)| LoadError::database("closing database", e))?;
        writeln!(
            out,
            "\nDatabase '{}' created successfully!",
            self.config.database.display()
        )
        .map_err(LoadError::Output)?;
        Ok(report)
    }

    fn load<W: Write>(&self, conn: &mut Connection, out: &mut W) -> Result<LoadReport> {
        let mode = self.config.mode;
        info!(
            "Loading into {:?} with {} keys",
            self.config.database,
            mode.as_str()
        );
        prepare_schema(conn, mode)?;
        writeln!(out, "Tables created successfully!").map_err(LoadError::Output)?;

        let options = ImportOptions {
            mode,
            delimiter: self.config.delimiter,
            encoding: self.config.encoding,
        };
        let mut imports = Vec::new();
        for (table, path) in self.config.sources.in_load_order() {
            let report = import_file(conn, path, table, &options)?;
            writeln!(
                out,
                "Imported {} rows from {} to {} table",
                report.rows,
                path.display(),
                table
            )
            .map_err(LoadError::Output)?;
            imports.push(report);
        }

        let counts = summarize(conn)?;
        write!(out, "\n{}", render_summary(&counts)).map_err(LoadError::Output)?;

        Ok(LoadReport {
            database: self.config.database.clone(),
            mode,
            imports,
            counts,
        })
    }
}
