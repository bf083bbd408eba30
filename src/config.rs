//! Load configuration and its defaults.
//!
//! A default [`LoadConfig`] reproduces the stock layout: the four extracts
//! under `Data/`, written into `university_data.db` with keys enforced.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use encoding_rs::{Encoding, UTF_8};

use crate::schema::Table;

/// Database file written when no path is given.
pub const DEFAULT_DATABASE: &str = "university_data.db";

/// Directory holding the source extracts when no directory is given.
pub const DEFAULT_DATA_DIR: &str = "Data";

pub const DEPARTMENTS_FILE: &str = "Department_Information.csv";
pub const EMPLOYEES_FILE: &str = "Employee_Information.csv";
// Misspelled upstream; the extract is published under this name.
pub const STUDENT_COUNSELING_FILE: &str = "Student_Counceling_Information.csv";
pub const STUDENT_PERFORMANCE_FILE: &str = "Student_Performance_Data.csv";

/// Whether primary and foreign keys are declared on the destination tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ConstraintMode {
    /// Keys declared and enforced; rows are upserted on their primary key.
    #[default]
    Enforced,
    /// No keys; every row is inserted verbatim, duplicates included.
    Unconstrained,
}

impl ConstraintMode {
    pub fn enforces_keys(self) -> bool {
        matches!(self, ConstraintMode::Enforced)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintMode::Enforced => "enforced",
            ConstraintMode::Unconstrained => "unconstrained",
        }
    }
}

/// Source file for each destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFiles {
    pub departments: PathBuf,
    pub employees: PathBuf,
    pub student_counseling: PathBuf,
    pub student_performance: PathBuf,
}

impl SourceFiles {
    /// Stock file names resolved against `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            departments: data_dir.join(DEPARTMENTS_FILE),
            employees: data_dir.join(EMPLOYEES_FILE),
            student_counseling: data_dir.join(STUDENT_COUNSELING_FILE),
            student_performance: data_dir.join(STUDENT_PERFORMANCE_FILE),
        }
    }

    pub fn path_for(&self, table: Table) -> &Path {
        match table {
            Table::Departments => &self.departments,
            Table::Employees => &self.employees,
            Table::StudentCounseling => &self.student_counseling,
            Table::StudentPerformance => &self.student_performance,
        }
    }

    /// Pairs each table with its source, referenced tables first.
    pub fn in_load_order(&self) -> impl Iterator<Item = (Table, &Path)> {
        Table::LOAD_ORDER
            .iter()
            .map(move |table| (*table, self.path_for(*table)))
    }
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self::in_dir(Path::new(DEFAULT_DATA_DIR))
    }
}

#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub database: PathBuf,
    pub mode: ConstraintMode,
    pub sources: SourceFiles,
    /// Field delimiter; inferred from each file's extension when unset.
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            mode: ConstraintMode::default(),
            sources: SourceFiles::default(),
            delimiter: None,
            encoding: UTF_8,
        }
    }
}
