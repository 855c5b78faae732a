use std::io;

use thiserror::Error;

/// Result type local to tabula-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lock '{path}': {source}")]
    Lock { path: String, source: io::Error },

    #[error("replace '{path}': {source}")]
    Persist { path: String, source: io::Error },
}

impl From<Error> for tabula_core::Error {
    fn from(e: Error) -> Self {
        tabula_core::Error::Storage(e.to_string())
    }
}
