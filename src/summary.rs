//! Post-load row counts.

use std::fmt::Write as _;

use rusqlite::Connection;

use crate::{
    error::{LoadError, Result},
    schema::{Table, quote_identifier},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCount {
    pub table: Table,
    pub rows: u64,
}

/// Counts the rows of every table, in load order.
///
/// A missing table means the load did not finish and is reported as an error.
pub fn summarize(conn: &Connection) -> Result<Vec<TableCount>> {
    Table::LOAD_ORDER
        .into_iter()
        .map(|table| -> Result<TableCount> {
            let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table.name()));
            let rows: i64 = conn
                .query_row(&sql, [], |row| row.get(0))
                .map_err(|e| LoadError::database(format!("counting rows of '{table}'"), e))?;
            Ok(TableCount {
                table,
                rows: rows.max(0) as u64,
            })
        })
        .collect()
}

pub fn render_summary(counts: &[TableCount]) -> String {
    let mut output = String::from("=== Database Summary ===\n");
    for count in counts {
        let _ = writeln!(output, "{}: {} rows", count.table, count.rows);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_tables_in_given_order() {
        let counts = [
            TableCount {
                table: Table::Departments,
                rows: 3,
            },
            TableCount {
                table: Table::StudentPerformance,
                rows: 0,
            },
        ];
        assert_eq!(
            render_summary(&counts),
            "=== Database Summary ===\ndepartments: 3 rows\nstudent_performance: 0 rows\n"
        );
    }

    #[test]
    fn missing_table_is_an_error() {
        let conn = Connection::open_in_memory().expect("open");
        let err = summarize(&conn).unwrap_err();
        assert!(matches!(err, LoadError::Database { ref action, .. } if action.contains("departments")));
    }
}
