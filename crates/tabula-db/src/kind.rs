//! The three table kinds and everything that differs between them:
//! schema, uniqueness key, and the shape of their `select` criteria.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabula_core::prelude::{ArityPolicy, Error, Result, Row, Scalar, Schema};
use tabula_operators::Predicate;

const EMPLOYEE_COLUMNS: &[&str] = &["e_id", "department_id", "name", "age", "salary"];
const DEPARTMENT_COLUMNS: &[&str] = &["d_id", "department_name"];
const GOODS_COLUMNS: &[&str] = &[
    "g_id",
    "product_name",
    "price",
    "category",
    "stock",
    "employee_id",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Employee,
    Department,
    Goods,
}

impl TableKind {
    pub fn name(self) -> &'static str {
        match self {
            TableKind::Employee => "employee",
            TableKind::Department => "department",
            TableKind::Goods => "goods",
        }
    }

    /// Column order of the file header and of raw insert lines.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Employee => EMPLOYEE_COLUMNS,
            TableKind::Department => DEPARTMENT_COLUMNS,
            TableKind::Goods => GOODS_COLUMNS,
        }
    }

    pub fn schema(self) -> Schema {
        Schema::new(self.columns().iter().copied())
    }

    pub fn key_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Employee => &["e_id", "department_id"],
            TableKind::Department => &["d_id"],
            TableKind::Goods => &["g_id"],
        }
    }

    /// Projection compared for uniqueness. An absent column projects to
    /// `None`.
    pub fn unique_key<'a>(self, row: &'a Row) -> Vec<Option<&'a str>> {
        self.key_columns().iter().map(|c| row.get(c)).collect()
    }

    /// Build this kind's filter from positional criteria:
    /// - employee: `(start_id, end_id)`, inclusive numeric range on `e_id`
    /// - department: `(name)`, exact match on `department_name`
    /// - goods: `(threshold)`, `price` strictly greater than it
    pub fn predicate(self, criteria: &[Scalar]) -> Result<Predicate> {
        match (self, criteria) {
            (TableKind::Employee, [start, end]) => match (start.as_f64(), end.as_f64()) {
                (Some(start), Some(end)) => Ok(Predicate::IntRange {
                    column: "e_id".into(),
                    start,
                    end,
                }),
                _ => Err(self.bad_criteria(criteria)),
            },
            (TableKind::Department, [name]) => match name.as_str() {
                Some(name) => Ok(Predicate::Equals {
                    column: "department_name".into(),
                    value: name.to_string(),
                }),
                None => Err(self.bad_criteria(criteria)),
            },
            (TableKind::Goods, [threshold]) => match threshold.as_f64() {
                Some(threshold) => Ok(Predicate::GreaterThan {
                    column: "price".into(),
                    threshold,
                }),
                None => Err(self.bad_criteria(criteria)),
            },
            _ => Err(self.bad_criteria(criteria)),
        }
    }

    fn bad_criteria(self, criteria: &[Scalar]) -> Error {
        let expected = match self {
            TableKind::Employee => "(start_id, end_id) numbers",
            TableKind::Department => "(department_name) text",
            TableKind::Goods => "(price_threshold) number",
        };
        let got: Vec<String> = criteria.iter().map(|c| format!("{c:?}")).collect();
        Error::InvalidCriteria(format!(
            "{} filter takes {expected}, got [{}]",
            self.name(),
            got.join(", ")
        ))
    }

    /// Split a raw line on whitespace and map tokens positionally onto the
    /// schema.
    ///
    /// `Strict` requires exactly one token per column. `Lenient` drops excess
    /// tokens and leaves trailing columns absent, but still requires every
    /// key column.
    pub fn parse_record(self, raw: &str, policy: ArityPolicy) -> Result<Row> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let columns = self.columns();
        let arity_error = || Error::RecordArity {
            table: self.name().to_string(),
            expected: columns.len(),
            found: tokens.len(),
        };

        if policy == ArityPolicy::Strict && tokens.len() != columns.len() {
            return Err(arity_error());
        }
        let row: Row = columns.iter().copied().zip(tokens.iter().copied()).collect();
        if self.key_columns().iter().any(|c| !row.contains(c)) {
            return Err(arity_error());
        }
        Ok(row)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_and_keys() {
        assert_eq!(TableKind::Goods.schema().len(), 6);
        let row = TableKind::Employee
            .parse_record("1 201 John 35 45000", ArityPolicy::Strict)
            .unwrap();
        assert_eq!(
            TableKind::Employee.unique_key(&row),
            vec![Some("1"), Some("201")]
        );
        assert_eq!(row.get("salary"), Some("45000"));
    }

    #[test]
    fn test_strict_arity() {
        let err = TableKind::Department
            .parse_record("203 Finance Extra", ArityPolicy::Strict)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::RecordArity {
                expected: 2,
                found: 3,
                ..
            }
        ));
        assert!(TableKind::Department
            .parse_record("", ArityPolicy::Strict)
            .is_err());
    }

    #[test]
    fn test_lenient_arity() {
        let row = TableKind::Department
            .parse_record("203 Finance Extra", ArityPolicy::Lenient)
            .unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("department_name"), Some("Finance"));

        let row = TableKind::Employee
            .parse_record("4 204 Zoe", ArityPolicy::Lenient)
            .unwrap();
        assert_eq!(row.get("age"), None);
        assert_eq!(row.len(), 3);

        // Key columns can never be absent.
        assert!(TableKind::Employee
            .parse_record("4", ArityPolicy::Lenient)
            .is_err());
    }

    #[test]
    fn test_predicates_from_criteria() {
        let p = TableKind::Employee
            .predicate(&[Scalar::Int(1), Scalar::Int(3)])
            .unwrap();
        assert_eq!(p.column(), "e_id");

        let p = TableKind::Employee
            .predicate(&[Scalar::Int(1), Scalar::Float(2.5)])
            .unwrap();
        assert!(matches!(p, Predicate::IntRange { start, end, .. } if start == 1.0 && end == 2.5));

        let p = TableKind::Goods.predicate(&[1100.0.into()]).unwrap();
        assert!(matches!(p, Predicate::GreaterThan { threshold, .. } if threshold == 1100.0));

        assert!(matches!(
            TableKind::Department.predicate(&[]),
            Err(Error::InvalidCriteria(_))
        ));
        assert!(matches!(
            TableKind::Department.predicate(&[Scalar::Int(201)]),
            Err(Error::InvalidCriteria(_))
        ));
        assert!(matches!(
            TableKind::Employee.predicate(&["a".into(), "b".into()]),
            Err(Error::InvalidCriteria(_))
        ));
    }
}
