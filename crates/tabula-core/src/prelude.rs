//! Convenient re-exports for downstream crates.

pub use crate::config::{ArityPolicy, EngineConfig};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::row::Row;
pub use crate::schema::Schema;
pub use crate::types::Scalar;
