//! Column aggregation: avg / max / min / count.
//!
//! Only rows that carry the column take part. Every such value must parse as
//! a float; a non-numeric value and an absent column both surface as
//! `Error::InvalidColumn`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabula_core::prelude::{Error, Result, Row};

use crate::filter::parse_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggOp {
    Avg,
    Max,
    Min,
    Count,
}

impl FromStr for AggOp {
    type Err = Error;

    /// Case-insensitive. The error carries the operation as given.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "avg" => Ok(AggOp::Avg),
            "max" => Ok(AggOp::Max),
            "min" => Ok(AggOp::Min),
            "count" => Ok(AggOp::Count),
            _ => Err(Error::UnknownOperation(s.to_string())),
        }
    }
}

impl fmt::Display for AggOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggOp::Avg => "avg",
            AggOp::Max => "max",
            AggOp::Min => "min",
            AggOp::Count => "count",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AggValue {
    Number(f64),
    Count(usize),
}

impl AggValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            AggValue::Number(v) => *v,
            AggValue::Count(n) => *n as f64,
        }
    }
}

impl PartialEq<f64> for AggValue {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == *other
    }
}

impl fmt::Display for AggValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggValue::Number(v) => write!(f, "{v}"),
            AggValue::Count(n) => write!(f, "{n}"),
        }
    }
}

/// Coerce `column` of every row that has it. Fails if any value is
/// non-numeric or if no row has the column.
pub fn column_values(rows: &[Row], column: &str) -> Result<Vec<f64>> {
    let values = rows
        .iter()
        .filter_map(|row| row.get(column))
        .map(|cell| parse_number(cell).ok_or_else(|| Error::InvalidColumn(column.to_string())))
        .collect::<Result<Vec<f64>>>()?;
    if values.is_empty() {
        return Err(Error::InvalidColumn(column.to_string()));
    }
    Ok(values)
}

/// `values` must be non-empty.
pub fn reduce(op: AggOp, values: &[f64]) -> AggValue {
    match op {
        AggOp::Avg => AggValue::Number(values.iter().sum::<f64>() / values.len() as f64),
        AggOp::Max => AggValue::Number(values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        AggOp::Min => AggValue::Number(values.iter().copied().fold(f64::INFINITY, f64::min)),
        AggOp::Count => AggValue::Count(values.len()),
    }
}

/// Values are extracted before the operation is resolved, so a bad column
/// is reported ahead of a bad operation name.
pub fn aggregate(rows: &[Row], op: &str, column: &str) -> Result<AggValue> {
    let values = column_values(rows, column)?;
    let op: AggOp = op.parse()?;
    Ok(reduce(op, &values))
}
