//! Registry: the catalog of named tables and the cross-table operations.
//!
//! Callers go through the registry for everything: insert, select, join,
//! multi-join, aggregate. Reads work on row snapshots and never mutate a
//! table.

use std::collections::HashMap;
use std::sync::Arc;

use tabula_core::prelude::{EngineConfig, Error, Result, Row, Scalar};
use tabula_operators::aggregate::{self, AggValue};
use tabula_operators::filter::Predicate;
use tabula_operators::join::{chain_join, nested_loop_join, JoinCondition};

use crate::kind::TableKind;
use crate::metrics::record_op;
use crate::table::Table;

#[derive(Debug, Default)]
pub struct Registry {
    cfg: EngineConfig,
    tables: HashMap<String, Arc<Table>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: EngineConfig) -> Self {
        Self {
            cfg,
            tables: HashMap::new(),
        }
    }

    /// Settings used by `open_table`.
    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Bind `name` to `table`. Re-registering a name replaces the previous
    /// table, which is handed back.
    pub fn register_table(
        &mut self,
        name: impl Into<String>,
        table: Table,
    ) -> Option<Arc<Table>> {
        let name = name.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(%name, kind = %table.kind(), "register table");
        self.tables.insert(name, Arc::new(table))
    }

    /// Open `<data_dir>/<name>.csv` as a table of `kind` and register it.
    pub fn open_table(&mut self, name: &str, kind: TableKind) -> Result<Arc<Table>> {
        let cfg = self.config();
        let table = Table::open(kind, cfg.table_path(name), cfg)?;
        self.register_table(name, table);
        self.table(name)
    }

    pub fn table(&self, name: &str) -> Result<Arc<Table>> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::table_not_found(name))
    }

    /// Registered names, sorted.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Re-read a table from its store.
    pub fn reload(&self, name: &str) -> Result<()> {
        self.table(name)?.load()
    }

    pub fn insert(&self, table_name: &str, raw_line: &str) -> Result<()> {
        self.table(table_name)?.add_record(raw_line)
    }

    /// Run the table's own filter with positional `criteria`.
    pub fn select(&self, table_name: &str, criteria: &[Scalar]) -> Result<Vec<Row>> {
        self.table(table_name)?.filter(criteria)
    }

    /// Filter any table with a "column OP literal" expression.
    pub fn select_where(&self, table_name: &str, expr: &str) -> Result<Vec<Row>> {
        let table = self.table(table_name)?;
        let predicate = Predicate::parse(expr)?;
        Ok(table.filter_by(&predicate))
    }

    /// Equality join of two tables. Missing tables are reported together.
    pub fn join(
        &self,
        left_table: &str,
        right_table: &str,
        left_field: &str,
        right_field: &str,
    ) -> Result<Vec<Row>> {
        let [left, right] = self.resolve([left_table, right_table])?;
        let out = nested_loop_join(&left.rows(), &right.rows(), left_field, right_field)?;
        record_op("join", &format!("{left_table},{right_table}"), out.len());
        Ok(out)
    }

    /// Left-deep join of `table_names`, condition `i` joining table `i + 1`
    /// into the accumulated result. Needs exactly one condition fewer than
    /// tables; that is checked before any table is looked up.
    pub fn multi_join<S: AsRef<str>>(
        &self,
        table_names: &[S],
        join_conditions: &[JoinCondition],
    ) -> Result<Vec<Row>> {
        if table_names.is_empty() || join_conditions.len() != table_names.len() - 1 {
            return Err(Error::ArityMismatch {
                tables: table_names.len(),
                conditions: join_conditions.len(),
            });
        }

        // Resolve in order; the first missing name is the one reported.
        let tables = table_names
            .iter()
            .map(|name| self.table(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let snapshots: Vec<Arc<Vec<Row>>> = tables.iter().map(|t| t.rows()).collect();

        let steps: Vec<(&[Row], &JoinCondition)> = snapshots[1..]
            .iter()
            .map(|rows| rows.as_slice())
            .zip(join_conditions.iter())
            .collect();
        let out = chain_join(&snapshots[0], &steps);

        let target: Vec<&str> = table_names.iter().map(|n| n.as_ref()).collect();
        record_op("multi_join", &target.join(","), out.len());
        Ok(out)
    }

    /// Aggregate `column` over a registered table.
    pub fn aggregate_table(
        &self,
        table_name: &str,
        operation: &str,
        column: &str,
    ) -> Result<AggValue> {
        let table = self.table(table_name)?;
        aggregate::aggregate(&table.rows(), operation, column)
    }

    /// Aggregate `column` over an already materialized result, such as the
    /// output of `join` or `multi_join`.
    pub fn aggregate_rows(&self, rows: &[Row], operation: &str, column: &str) -> Result<AggValue> {
        aggregate::aggregate(rows, operation, column)
    }

    fn resolve<const N: usize>(&self, names: [&str; N]) -> Result<[Arc<Table>; N]> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !self.tables.contains_key(**n))
            .map(|n| n.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::TableNotFound { names: missing });
        }
        let tables = names.map(|n| Arc::clone(&self.tables[n]));
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_io::MemoryStore;

    fn employee(e_id: &str, dept: &str, name: &str, age: &str, salary: &str) -> Row {
        TableKind::Employee
            .columns()
            .iter()
            .copied()
            .zip([e_id, dept, name, age, salary])
            .collect()
    }

    fn registry() -> Registry {
        let cfg = EngineConfig::default();
        let mut reg = Registry::with_config(cfg.clone());
        let employees = MemoryStore::new("employees").with_rows(vec![
            employee("1", "201", "John", "35", "45000"),
            employee("2", "202", "Emily", "28", "48000"),
        ]);
        let departments = MemoryStore::new("departments").with_rows(vec![
            [("d_id", "201"), ("department_name", "Accounting")]
                .into_iter()
                .collect(),
        ]);
        reg.register_table(
            "employees",
            Table::with_store(TableKind::Employee, Box::new(employees), &cfg).unwrap(),
        );
        reg.register_table(
            "departments",
            Table::with_store(TableKind::Department, Box::new(departments), &cfg).unwrap(),
        );
        reg
    }

    #[test]
    fn test_join_reports_all_missing_tables() {
        let reg = registry();
        let err = reg.join("nope", "test_department", "a", "b").unwrap_err();
        match err {
            Error::TableNotFound { names } => assert_eq!(names, vec!["nope", "test_department"]),
            other => panic!("unexpected {other:?}"),
        }
        let err = reg
            .join("employees", "test_department", "department_id", "d_id")
            .unwrap_err();
        assert!(matches!(err, Error::TableNotFound { names } if names == vec!["test_department"]));
    }

    #[test]
    fn test_multi_join_arity_checked_first() {
        let reg = registry();
        let err = reg
            .multi_join(
                &["ghost_a", "ghost_b", "ghost_c"],
                &[JoinCondition::new("a", "b")],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                tables: 3,
                conditions: 1
            }
        ));

        let none: [&str; 0] = [];
        assert!(matches!(
            reg.multi_join(&none, &[]),
            Err(Error::ArityMismatch { tables: 0, .. })
        ));
    }

    #[test]
    fn test_multi_join_single_table_is_identity() {
        let reg = registry();
        let out = reg.multi_join(&["employees"], &[]).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_reregister_last_writer_wins() {
        let mut reg = registry();
        let cfg = EngineConfig::default();
        let replaced = reg.register_table(
            "departments",
            Table::with_store(TableKind::Department, Box::new(MemoryStore::new("d2")), &cfg)
                .unwrap(),
        );
        assert_eq!(replaced.unwrap().len(), 1);
        assert!(reg.table("departments").unwrap().is_empty());
        assert_eq!(reg.table_names(), vec!["departments", "employees"]);
    }

    #[test]
    fn test_select_where() {
        let reg = registry();
        let rows = reg.select_where("employees", "age < 30").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("Emily"));
        assert!(matches!(
            reg.select_where("employees", "age"),
            Err(Error::InvalidCriteria(_))
        ));
    }
}
