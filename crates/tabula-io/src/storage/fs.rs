use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tabula_core::hash::hash_bytes;
use tabula_core::prelude::{Row, Schema};
use tempfile::NamedTempFile;

use super::{RowStore, StoreLock};
use crate::error::{Error, Result};

/// One table backed by one CSV file: header row, then one record per row.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    lock_files: bool,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_files: true,
        }
    }

    /// Toggle the advisory `<file>.lock` taken by `lock()`.
    pub fn with_file_lock(mut self, enabled: bool) -> Self {
        self.lock_files = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl RowStore for CsvStore {
    fn load(&self) -> Result<Vec<Row>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let headers = rdr.headers()?.clone();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(headers.iter().zip(record.iter()).collect::<Row>());
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(path = %self.path.display(), rows = rows.len(), "csv load");
        Ok(rows)
    }

    fn save(&self, schema: &Schema, rows: &[Row]) -> Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;

        // Write beside the target so the final rename stays on one filesystem.
        let tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut w = csv::Writer::from_writer(tmp.as_file());
            w.write_record(schema.iter())?;
            for row in rows {
                w.write_record(schema.iter().map(|c| row.get(c).unwrap_or("")))?;
            }
            w.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Persist {
            path: self.path.display().to_string(),
            source: e.error,
        })?;
        #[cfg(feature = "tracing")]
        tracing::trace!(path = %self.path.display(), rows = rows.len(), "csv save");
        Ok(())
    }

    fn lock(&self) -> Result<StoreLock> {
        if !self.lock_files {
            return Ok(StoreLock::none());
        }
        fs::create_dir_all(self.parent_dir())?;
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive().map_err(|source| Error::Lock {
            path: lock_path.display().to_string(),
            source,
        })?;
        Ok(StoreLock::held(file))
    }

    fn etag(&self) -> Result<Option<String>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(hash_bytes(&bytes).to_hex())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
