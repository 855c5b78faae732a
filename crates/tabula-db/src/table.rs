//! A file-backed table: one `TableKind`, one `RowStore`, and the rows
//! currently loaded from it.
//!
//! Reads take a snapshot (`Arc<Vec<Row>>`) and never block inserts for
//! longer than a pointer swap. Inserts are serialized per table by the
//! writer mutex, and across processes by the store's file lock, for the
//! whole reload-check-append-save sequence.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tabula_core::hash::{hash_serde, Hash256};
use tabula_core::prelude::{ArityPolicy, EngineConfig, Error, Result, Row, Scalar, Schema};
use tabula_io::{CsvStore, RowStore};
use tabula_operators::filter::{filter_rows, Predicate};

use crate::kind::TableKind;
use crate::metrics::record_op;

struct WriterState {
    /// Store etag as of our last load or save.
    etag: Option<String>,
}

pub struct Table {
    kind: TableKind,
    store: Box<dyn RowStore>,
    policy: ArityPolicy,
    reload_on_change: bool,
    rows: RwLock<Arc<Vec<Row>>>,
    writer: Mutex<WriterState>,
}

impl Table {
    /// Open a CSV-backed table and load it eagerly. A missing file is an
    /// empty table.
    pub fn open(kind: TableKind, path: impl Into<PathBuf>, cfg: &EngineConfig) -> Result<Self> {
        let store = CsvStore::new(path).with_file_lock(cfg.lock_files);
        Self::with_store(kind, Box::new(store), cfg)
    }

    pub fn with_store(
        kind: TableKind,
        store: Box<dyn RowStore>,
        cfg: &EngineConfig,
    ) -> Result<Self> {
        let table = Self {
            kind,
            store,
            policy: cfg.arity_policy,
            reload_on_change: cfg.reload_on_change,
            rows: RwLock::new(Arc::new(Vec::new())),
            writer: Mutex::new(WriterState { etag: None }),
        };
        table.load()?;
        Ok(table)
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn schema(&self) -> Schema {
        self.kind.schema()
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Snapshot of the current rows.
    pub fn rows(&self) -> Arc<Vec<Row>> {
        Arc::clone(&self.rows.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Digest of the current row content.
    pub fn fingerprint(&self) -> Result<Hash256> {
        hash_serde(&*self.rows())
    }

    /// Re-read every row from the store, discarding the in-memory copy.
    pub fn load(&self) -> Result<()> {
        let mut writer = self.writer();
        self.load_locked(&mut writer)
    }

    /// Rewrite the store from the in-memory rows.
    pub fn save(&self) -> Result<()> {
        let mut writer = self.writer();
        let _lock = self.store.lock()?;
        let rows = self.rows();
        self.store.save(&self.kind.schema(), &rows)?;
        writer.etag = self.store.etag().unwrap_or(None);
        Ok(())
    }

    /// Parse `raw_line`, reject it if its key is already present, then
    /// append and persist. A rejected or failed insert changes nothing.
    pub fn add_record(&self, raw_line: &str) -> Result<()> {
        let row = self.kind.parse_record(raw_line, self.policy)?;

        let mut writer = self.writer();
        let _lock = self.store.lock()?;
        if self.reload_on_change && self.store.etag()? != writer.etag {
            #[cfg(feature = "tracing")]
            tracing::debug!(table = %self.location(), "store changed; reloading before insert");
            self.load_locked(&mut writer)?;
        }

        let current = self.rows();
        let key = self.kind.unique_key(&row);
        if current.iter().any(|r| self.kind.unique_key(r) == key) {
            return Err(Error::DuplicateKey {
                table: self.kind.name().to_string(),
                key: key.iter().map(|k| k.unwrap_or("").to_string()).collect(),
            });
        }

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(row);
        self.store.save(&self.kind.schema(), &next)?;

        let len = next.len();
        *self.rows.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        // Unknown etag forces a reload on the next insert.
        writer.etag = self.store.etag().unwrap_or(None);

        record_op("insert", &self.location(), len);
        Ok(())
    }

    /// This kind's filter, built from positional criteria.
    pub fn filter(&self, criteria: &[Scalar]) -> Result<Vec<Row>> {
        let predicate = self.kind.predicate(criteria)?;
        Ok(self.filter_by(&predicate))
    }

    pub fn filter_by(&self, predicate: &Predicate) -> Vec<Row> {
        filter_rows(&self.rows(), predicate)
    }

    fn load_locked(&self, writer: &mut WriterState) -> Result<()> {
        // Etag first: a write landing in between only costs an extra reload.
        let etag = self.store.etag()?;
        let rows = self.store.load()?;
        #[cfg(feature = "tracing")]
        tracing::trace!(table = %self.location(), rows = rows.len(), "loaded");
        *self.rows.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(rows);
        writer.etag = etag;
        Ok(())
    }

    fn writer(&self) -> MutexGuard<'_, WriterState> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("kind", &self.kind)
            .field("location", &self.location())
            .field("rows", &self.len())
            .finish()
    }
}
