#![forbid(unsafe_code)]
//! tabula-io: where rows live between process runs.
//!
//! - `storage`: the `RowStore` trait and the CSV file backend.
//! - `memory_storage`: a shared in-memory backend for tests and scratch tables.
//! - `writers`: result export (NDJSON).

pub mod error;
pub mod memory_storage;
pub mod storage;
pub mod writers;

pub use error::{Error, Result};
pub use memory_storage::MemoryStore;
pub use storage::{CsvStore, RowStore, StoreLock};
