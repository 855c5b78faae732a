//! In-memory storage backend for testing.
//!
//! Clones share one state, so a test can keep a handle to inspect what a
//! table saved (row contents, number of saves).

use std::sync::{Arc, Mutex, MutexGuard};

use tabula_core::prelude::{Row, Schema};

use crate::error::Result;
use crate::storage::{RowStore, StoreLock};

#[derive(Default)]
struct State {
    rows: Option<Vec<Row>>,
    saves: usize,
    version: u64,
}

/// Thread-safe in-memory row store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    name: String,
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::default(),
        }
    }

    /// Pre-populate rows as if a previous run had saved them.
    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        {
            let mut st = self.state();
            st.rows = Some(rows);
            st.version += 1;
        }
        self
    }

    /// Rows as last saved (or seeded), `None` if never written.
    pub fn stored_rows(&self) -> Option<Vec<Row>> {
        self.state().rows.clone()
    }

    /// Number of `save` calls so far.
    pub fn saves(&self) -> usize {
        self.state().saves
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl RowStore for MemoryStore {
    fn load(&self) -> Result<Vec<Row>> {
        Ok(self.state().rows.clone().unwrap_or_default())
    }

    fn save(&self, schema: &Schema, rows: &[Row]) -> Result<()> {
        // Same shape a CSV round trip would give: schema columns only, in order.
        let projected = rows
            .iter()
            .map(|row| {
                schema
                    .iter()
                    .map(|c| (c, row.get(c).unwrap_or("")))
                    .collect::<Row>()
            })
            .collect();
        let mut st = self.state();
        st.rows = Some(projected);
        st.saves += 1;
        st.version += 1;
        Ok(())
    }

    fn lock(&self) -> Result<StoreLock> {
        Ok(StoreLock::none())
    }

    fn etag(&self) -> Result<Option<String>> {
        let st = self.state();
        Ok(st.rows.as_ref().map(|_| format!("mem-{}", st.version)))
    }

    fn location(&self) -> String {
        format!("memory://{}", self.name)
    }
}
