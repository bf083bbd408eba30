#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::{TempDir, tempdir};
use university_loader::{
    ConstraintMode,
    config::{LoadConfig, SourceFiles},
};

pub const DEPARTMENTS_CSV: &str = "\
Department_ID,Department_Name,DOE
IDEPT1,Computer Science,1943-07-01
IDEPT2,Mathematics,1951-01-15
IDEPT3,Physics,1960-03-20
";

pub const EMPLOYEES_CSV: &str = "\
Employee ID,DOB,DOJ,Department_ID
IU196557,1983-11-26,2006-12-11,IDEPT1
IU449901,1977-05-02,2001-08-30,IDEPT2
";

pub const STUDENT_COUNSELING_CSV: &str = "\
Student_ID,DOA,DOB,Department_Choices,Department_Admission
SID20131143,2013-07-01,1996-02-05,IDEPT1,IDEPT1
SID20131151,2013-07-01,1995-09-10,\"IDEPT2,IDEPT3\",IDEPT2
";

pub const STUDENT_PERFORMANCE_CSV: &str = "\
Student_ID,Semster_Name,Paper_ID,Paper_Name,Marks,Effort_Hours
SID20131143,Sem_1,SEMI0012995,Paper 1,44,5
SID20131143,Sem_1,SEMI0015183,Paper 2,74,8
SID20131151,Sem_1,SEMI0012995,Paper 1,80,6
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path().join("Data")
    }

    pub fn database(&self) -> PathBuf {
        self.path().join("university_data.db")
    }

    /// Writes the four stock extracts under `Data/`.
    pub fn write_stock_extracts(&self) {
        self.write_extracts(
            DEPARTMENTS_CSV,
            EMPLOYEES_CSV,
            STUDENT_COUNSELING_CSV,
            STUDENT_PERFORMANCE_CSV,
        );
    }

    pub fn write_extracts(
        &self,
        departments: &str,
        employees: &str,
        counseling: &str,
        performance: &str,
    ) {
        self.write("Data/Department_Information.csv", departments);
        self.write("Data/Employee_Information.csv", employees);
        self.write("Data/Student_Counceling_Information.csv", counseling);
        self.write("Data/Student_Performance_Data.csv", performance);
    }

    pub fn config(&self, mode: ConstraintMode) -> LoadConfig {
        LoadConfig {
            database: self.database(),
            mode,
            sources: SourceFiles::in_dir(&self.data_dir()),
            ..LoadConfig::default()
        }
    }

    pub fn connect(&self) -> Connection {
        Connection::open(self.database()).expect("open database")
    }
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
        row.get(0)
    })
    .expect("count rows")
}
