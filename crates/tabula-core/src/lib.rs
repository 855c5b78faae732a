#![forbid(unsafe_code)]
//! tabula-core: shared vocabulary for the tabula table engine.
//!
//! Pure data only. Storage lives in `tabula-io`, row algorithms in
//! `tabula-operators`, and the table catalog in `tabula-db`.

pub mod config;
pub mod error;
pub mod hash;
pub mod prelude;
pub mod row;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use row::Row;
