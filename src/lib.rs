#![forbid(unsafe_code)]
//! tabula: CSV-backed tables with uniqueness checks, selection, joins, and
//! aggregation.
//!
//! ```no_run
//! use tabula::{EngineConfig, Registry, TableKind};
//!
//! # fn main() -> tabula::Result<()> {
//! let mut db = Registry::with_config(EngineConfig::from_env());
//! db.open_table("employees", TableKind::Employee)?;
//! db.insert("employees", "3 203 Michael 40 50000")?;
//! let avg = db.aggregate_table("employees", "avg", "salary")?;
//! println!("{avg}");
//! # Ok(())
//! # }
//! ```

pub use tabula_core::prelude::*;
pub use tabula_db::{Registry, Table, TableKind};
pub use tabula_io::writers::jsonl::JsonlWriter;
pub use tabula_io::{CsvStore, MemoryStore, RowStore};
pub use tabula_operators::{AggOp, AggValue, CmpOp, JoinCondition, Predicate};
