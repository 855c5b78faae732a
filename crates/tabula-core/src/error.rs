use thiserror::Error;

/// Canonical result for every tabula crate that surfaces errors to callers.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("table {} does not exist", .names.join(", "))]
    TableNotFound { names: Vec<String> },

    #[error("duplicate entry in table '{table}': key ({}) already present", .key.join(", "))]
    DuplicateKey { table: String, key: Vec<String> },

    #[error("multi-join over {tables} tables needs {} join conditions, got {conditions}", .tables.saturating_sub(1))]
    ArityMismatch { tables: usize, conditions: usize },

    #[error("column {0} does not contain valid data")]
    InvalidColumn(String),

    #[error("unknown aggregation method: {0}")]
    UnknownOperation(String),

    #[error("record for table '{table}' has {found} fields, schema expects {expected}")]
    RecordArity {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("join field '{0}' missing from row")]
    MissingField(String),

    #[error("invalid selection criteria: {0}")]
    InvalidCriteria(String),

    // The core crate does no I/O; `tabula-io` maps its failures into this.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Error::TableNotFound {
            names: vec![name.into()],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
