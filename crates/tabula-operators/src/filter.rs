//! Row predicates and the linear-scan filter.
//!
//! Stored values are text; numeric predicates parse the cell at evaluation
//! time, and a cell that does not parse simply does not match.
//! `Predicate::parse` accepts expressions of the form "col OP literal" where
//! OP ∈ {==, !=, <, <=, >, >=}.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tabula_core::prelude::{Error, Result, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    fn holds(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// `start <= int(row[column]) <= end`. Bounds may be fractional; the
    /// cell itself must be an integer.
    IntRange { column: String, start: f64, end: f64 },
    /// `row[column] == value` (exact text match)
    Equals { column: String, value: String },
    /// `float(row[column]) > threshold`
    GreaterThan { column: String, threshold: f64 },
    /// Parsed "col OP literal"; numeric when the literal parses, text otherwise.
    Compare {
        column: String,
        op: CmpOp,
        literal: String,
    },
}

impl Predicate {
    /// Parse a simple predicate like "age > 18" or "name == Alice".
    pub fn parse(expr: &str) -> Result<Self> {
        // Two-char ops first so "<=" is not read as "<".
        let ops = [
            CmpOp::Eq,
            CmpOp::Ne,
            CmpOp::Le,
            CmpOp::Ge,
            CmpOp::Lt,
            CmpOp::Gt,
        ];
        for op in ops {
            if let Some(pos) = expr.find(op.symbol()) {
                let column = expr[..pos].trim();
                let literal = unquote(expr[pos + op.symbol().len()..].trim());
                if column.is_empty() {
                    return Err(Error::InvalidCriteria(format!(
                        "missing column in predicate '{expr}'"
                    )));
                }
                return Ok(Predicate::Compare {
                    column: column.to_string(),
                    op,
                    literal: literal.to_string(),
                });
            }
        }
        Err(Error::InvalidCriteria(format!(
            "unparseable predicate: {expr}"
        )))
    }

    pub fn column(&self) -> &str {
        match self {
            Predicate::IntRange { column, .. }
            | Predicate::Equals { column, .. }
            | Predicate::GreaterThan { column, .. }
            | Predicate::Compare { column, .. } => column,
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        let Some(cell) = row.get(self.column()) else {
            return false;
        };
        match self {
            Predicate::IntRange { start, end, .. } => cell
                .trim()
                .parse::<i64>()
                .map(|v| (*start..=*end).contains(&(v as f64)))
                .unwrap_or(false),
            Predicate::Equals { value, .. } => cell == value,
            Predicate::GreaterThan { threshold, .. } => parse_number(cell)
                .map(|v| v > *threshold)
                .unwrap_or(false),
            // A numeric literal only matches numeric cells.
            Predicate::Compare { op, literal, .. } => match parse_number(literal) {
                Some(b) => parse_number(cell)
                    .and_then(|a| a.partial_cmp(&b))
                    .map(|o| op.holds(o))
                    .unwrap_or(false),
                None => op.holds(cell.cmp(literal.as_str())),
            },
        }
    }
}

/// Full scan; matching rows are cloned out in storage order.
pub fn filter_rows(rows: &[Row], predicate: &Predicate) -> Vec<Row> {
    rows.iter()
        .filter(|row| predicate.matches(row))
        .cloned()
        .collect()
}

pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

fn unquote(s: &str) -> &str {
    for q in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
