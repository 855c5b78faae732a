#![forbid(unsafe_code)]
//! tabula-db: file-backed tables and the registry that joins them.
//!
//! A `Registry` is an ordinary value; construct one per database and pass
//! it to whoever needs it. Each registered `Table` owns its rows and its
//! `RowStore`, and serializes its own inserts.

pub mod kind;
pub mod metrics;
pub mod registry;
pub mod table;

pub use kind::TableKind;
pub use registry::Registry;
pub use table::Table;
