//! NDJSON writer for row sequences (query results, table dumps).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tabula_core::Row;

use crate::error::Result;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    rows_written: usize,
}

impl JsonlWriter<File> {
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            rows_written: 0,
        }
    }

    /// Write each row as one JSON object per line, keys in row order.
    pub fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        for row in rows {
            serde_json::to_writer(&mut self.writer, row)?;
            self.writer.write_all(b"\n")?;
        }
        self.rows_written += rows.len();
        self.writer.flush()?;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}
