//! Destination table catalogue and DDL rendering.
//!
//! The four university tables are described once in [`Table`]; the
//! [`ConstraintMode`] decides at render time whether keys are declared and
//! whether inserts upsert on the primary key.
//!
//! Column names are the extract headers verbatim, so `Employee ID` keeps its
//! space and `Semster_Name` keeps its misspelling. Every identifier is
//! double-quoted when rendered.

use std::fmt;

use itertools::Itertools;
use log::{debug, info};
use rusqlite::Connection;

use crate::{
    config::ConstraintMode,
    error::{LoadError, Result},
};

/// Storage class of a destination column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
}

impl SqlType {
    pub fn as_sql(self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        sql_type: SqlType::Text,
    }
}

const fn integer(name: &'static str) -> Column {
    Column {
        name,
        sql_type: SqlType::Integer,
    }
}

const DEPARTMENT_COLUMNS: &[Column] = &[text("Department_ID"), text("Department_Name"), text("DOE")];

const EMPLOYEE_COLUMNS: &[Column] = &[
    text("Employee ID"),
    text("DOB"),
    text("DOJ"),
    text("Department_ID"),
];

const STUDENT_COUNSELING_COLUMNS: &[Column] = &[
    text("Student_ID"),
    text("DOA"),
    text("DOB"),
    text("Department_Choices"),
    text("Department_Admission"),
];

const STUDENT_PERFORMANCE_COLUMNS: &[Column] = &[
    text("Student_ID"),
    text("Semster_Name"),
    text("Paper_ID"),
    text("Paper_Name"),
    integer("Marks"),
    integer("Effort_Hours"),
];

/// A referencing column and the key it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references: Table,
    pub referenced_column: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Departments,
    Employees,
    StudentCounseling,
    StudentPerformance,
}

impl Table {
    /// Referenced tables come before the tables that reference them.
    pub const LOAD_ORDER: [Table; 4] = [
        Table::Departments,
        Table::Employees,
        Table::StudentCounseling,
        Table::StudentPerformance,
    ];

    /// Dependents are dropped before their dependencies.
    pub const DROP_ORDER: [Table; 4] = [
        Table::StudentPerformance,
        Table::StudentCounseling,
        Table::Employees,
        Table::Departments,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Departments => "departments",
            Table::Employees => "employees",
            Table::StudentCounseling => "student_counseling",
            Table::StudentPerformance => "student_performance",
        }
    }

    pub fn from_name(name: &str) -> Option<Table> {
        Table::LOAD_ORDER
            .into_iter()
            .find(|table| table.name() == name)
    }

    /// Columns populated from the extract, in declaration order.
    pub fn columns(self) -> &'static [Column] {
        match self {
            Table::Departments => DEPARTMENT_COLUMNS,
            Table::Employees => EMPLOYEE_COLUMNS,
            Table::StudentCounseling => STUDENT_COUNSELING_COLUMNS,
            Table::StudentPerformance => STUDENT_PERFORMANCE_COLUMNS,
        }
    }

    pub fn column(self, name: &str) -> Option<&'static Column> {
        self.columns().iter().find(|column| column.name == name)
    }

    /// Natural key declared as the primary key in enforced mode.
    pub fn primary_key(self) -> Option<&'static str> {
        match self {
            Table::Departments => Some("Department_ID"),
            Table::Employees => Some("Employee ID"),
            Table::StudentCounseling => Some("Student_ID"),
            Table::StudentPerformance => None,
        }
    }

    /// Auto-incrementing row id, only present in enforced mode.
    pub fn surrogate_key(self) -> Option<&'static str> {
        match self {
            Table::StudentPerformance => Some("id"),
            _ => None,
        }
    }

    pub fn foreign_key(self) -> Option<ForeignKey> {
        match self {
            Table::Departments => None,
            Table::Employees => Some(ForeignKey {
                column: "Department_ID",
                references: Table::Departments,
                referenced_column: "Department_ID",
            }),
            Table::StudentCounseling => Some(ForeignKey {
                column: "Department_Admission",
                references: Table::Departments,
                referenced_column: "Department_ID",
            }),
            Table::StudentPerformance => Some(ForeignKey {
                column: "Student_ID",
                references: Table::StudentCounseling,
                referenced_column: "Student_ID",
            }),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wraps `name` in double quotes, doubling any embedded quote.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn drop_table_sql(table: Table) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_identifier(table.name()))
}

pub fn create_table_sql(table: Table, mode: ConstraintMode) -> String {
    let enforced = mode.enforces_keys();
    let mut definitions = Vec::new();

    if let Some(id) = table.surrogate_key().filter(|_| enforced) {
        definitions.push(format!(
            "{} INTEGER PRIMARY KEY AUTOINCREMENT",
            quote_identifier(id)
        ));
    }
    for column in table.columns() {
        let mut definition = format!(
            "{} {}",
            quote_identifier(column.name),
            column.sql_type.as_sql()
        );
        if enforced && table.primary_key() == Some(column.name) {
            definition.push_str(" PRIMARY KEY");
        }
        definitions.push(definition);
    }
    if let Some(fk) = table.foreign_key().filter(|_| enforced) {
        definitions.push(format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            quote_identifier(fk.column),
            quote_identifier(fk.references.name()),
            quote_identifier(fk.referenced_column)
        ));
    }

    format!(
        "CREATE TABLE {} (\n    {}\n)",
        quote_identifier(table.name()),
        definitions.join(",\n    ")
    )
}

/// Full DDL for every table, in creation order.
pub fn schema_sql(mode: ConstraintMode) -> String {
    Table::LOAD_ORDER
        .iter()
        .map(|table| format!("{};\n", create_table_sql(*table, mode)))
        .join("\n")
}

/// Insert statement for `columns` in the given order.
///
/// Enforced mode replaces any existing row sharing the primary key, so the
/// last occurrence of a key in file order wins.
pub fn insert_sql(table: Table, columns: &[String], mode: ConstraintMode) -> String {
    let verb = match mode {
        ConstraintMode::Enforced => "INSERT OR REPLACE INTO",
        ConstraintMode::Unconstrained => "INSERT INTO",
    };
    let column_list = columns.iter().map(|c| quote_identifier(c)).join(", ");
    let placeholders = (1..=columns.len()).map(|idx| format!("?{idx}")).join(", ");
    format!(
        "{verb} {} ({column_list}) VALUES ({placeholders})",
        quote_identifier(table.name())
    )
}

/// Drops and recreates all four tables in one transaction.
///
/// Destructive: anything previously loaded is discarded.
pub fn prepare_schema(conn: &mut Connection, mode: ConstraintMode) -> Result<()> {
    let tx = conn
        .transaction()
        .map_err(|e| LoadError::database("starting schema transaction", e))?;
    for table in Table::DROP_ORDER {
        tx.execute_batch(&drop_table_sql(table))
            .map_err(|e| LoadError::database(format!("dropping table '{table}'"), e))?;
        debug!("Dropped table '{table}' if present");
    }
    for table in Table::LOAD_ORDER {
        let ddl = create_table_sql(table, mode);
        debug!("{ddl}");
        tx.execute_batch(&ddl)
            .map_err(|e| LoadError::database(format!("creating table '{table}'"), e))?;
    }
    tx.commit()
        .map_err(|e| LoadError::database("committing schema", e))?;
    info!(
        "Created {} table(s) with {} keys",
        Table::LOAD_ORDER.len(),
        mode.as_str()
    );
    Ok(())
}
