#![forbid(unsafe_code)]
//! tabula-operators: row-at-a-time operators (filter/join/aggregate).
//!
//! Design intent:
//! - Pure and synchronous; every operator reads `&[Row]` and never mutates it.
//! - Linear scans and nested loops only. Tables are small and unindexed.

pub mod aggregate;
pub mod filter;
pub mod join;

pub use aggregate::{AggOp, AggValue};
pub use filter::{CmpOp, Predicate};
pub use join::JoinCondition;
