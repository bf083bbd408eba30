mod common;

use std::collections::HashSet;

use common::{TestWorkspace, count_rows};
use proptest::prelude::*;
use rusqlite::Connection;
use university_loader::{
    ConstraintMode,
    importer::{ImportOptions, import_file},
    schema::{Table, prepare_schema},
};

fn departments_csv(ids: &[u8]) -> String {
    let mut csv = String::from("Department_ID,Department_Name,DOE\n");
    for (idx, id) in ids.iter().enumerate() {
        csv.push_str(&format!("D{id:02},Department {idx},19{:02}-01-01\n", idx % 100));
    }
    csv
}

fn load_departments(ids: &[u8], mode: ConstraintMode) -> (u64, i64) {
    let workspace = TestWorkspace::new();
    let source = workspace.write("departments.csv", &departments_csv(ids));
    let mut conn = Connection::open_in_memory().expect("open");
    prepare_schema(&mut conn, mode).expect("schema");
    let report = import_file(
        &mut conn,
        &source,
        Table::Departments,
        &ImportOptions::new(mode),
    )
    .expect("import");
    (report.rows, count_rows(&conn, "departments"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn reported_rows_equal_data_rows(ids in proptest::collection::vec(0u8..8, 0..40)) {
        let (reported, stored) = load_departments(&ids, ConstraintMode::Unconstrained);
        prop_assert_eq!(reported, ids.len() as u64);
        prop_assert_eq!(stored, ids.len() as i64);
    }

    #[test]
    fn enforced_table_holds_distinct_keys(ids in proptest::collection::vec(0u8..8, 0..40)) {
        let distinct = ids.iter().collect::<HashSet<_>>().len();
        let (reported, stored) = load_departments(&ids, ConstraintMode::Enforced);
        prop_assert_eq!(reported, ids.len() as u64);
        prop_assert_eq!(stored, distinct as i64);
    }
}
