//! Row storage adapters.
//!
//! A table never touches files directly; it goes through a `RowStore`:
//! - `fs`: CSV file on the local filesystem (default).
//! - `crate::memory_storage`: shared in-memory rows.

mod fs;
pub use fs::CsvStore;

use std::fs::File;

use fs2::FileExt;
use tabula_core::prelude::{Row, Schema};

use crate::error::Result;

/// Persistence seam for one table's rows.
///
/// Invariants:
/// - `load` on a store that was never written returns no rows, not an error.
/// - `save` replaces the whole content; readers see either the old or the
///   new content, never a mix.
pub trait RowStore: Send + Sync {
    /// Read every row. Keys come from the stored header.
    fn load(&self) -> Result<Vec<Row>>;

    /// Rewrite the store: header = `schema`, one record per row in schema
    /// order. Absent columns are written empty.
    fn save(&self, schema: &Schema, rows: &[Row]) -> Result<()>;

    /// Exclusive writer lock, released when the guard drops.
    fn lock(&self) -> Result<StoreLock>;

    /// Content tag that changes whenever the stored rows change.
    /// `None` if nothing has been stored yet.
    fn etag(&self) -> Result<Option<String>>;

    /// Human-readable location for logs and errors.
    fn location(&self) -> String;
}

/// Guard for `RowStore::lock`. Backends without cross-process locking hand
/// out an empty guard.
pub struct StoreLock {
    file: Option<File>,
}

impl StoreLock {
    pub fn none() -> Self {
        Self { file: None }
    }

    pub(crate) fn held(file: File) -> Self {
        Self { file: Some(file) }
    }

    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            let _ = FileExt::unlock(file);
        }
    }
}
