//! Engine configuration that downstream crates can serialize/deserialize.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How `add_record` treats a raw line whose token count differs from the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArityPolicy {
    /// Reject the line with `Error::RecordArity`.
    #[default]
    Strict,
    /// Zip tokens against the schema: extra tokens are dropped, missing
    /// tokens leave their columns absent.
    Lenient,
}

impl FromStr for ArityPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ArityPolicy::Strict),
            "lenient" => Ok(ArityPolicy::Lenient),
            other => Err(Error::Config(format!("unknown arity policy '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding `<table>.csv` files for `Registry::open_table`.
    pub data_dir: PathBuf,

    /// Token-count policy for raw insert lines.
    pub arity_policy: ArityPolicy,

    /// Take an advisory `<file>.lock` across each insert so separate
    /// processes serialize their read-modify-write.
    pub lock_files: bool,

    /// Before checking uniqueness, reload rows if the backing file changed
    /// since this process last read or wrote it.
    pub reload_on_change: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            arity_policy: ArityPolicy::Strict,
            lock_files: true,
            reload_on_change: true,
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TABULA_DATA_DIR`: directory for table files
    /// - `TABULA_ARITY_POLICY`: `strict` or `lenient`
    /// - `TABULA_LOCK_FILES`: enable advisory file locks
    /// - `TABULA_RELOAD_ON_CHANGE`: reload changed files before inserts
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = lookup("TABULA_DATA_DIR") {
            if !s.trim().is_empty() {
                cfg.data_dir = PathBuf::from(s);
            }
        }

        if let Some(s) = lookup("TABULA_ARITY_POLICY") {
            if let Ok(v) = s.parse::<ArityPolicy>() {
                cfg.arity_policy = v;
            }
        }

        if let Some(s) = lookup("TABULA_LOCK_FILES") {
            if let Some(v) = parse_flag(&s) {
                cfg.lock_files = v;
            }
        }

        if let Some(s) = lookup("TABULA_RELOAD_ON_CHANGE") {
            if let Some(v) = parse_flag(&s) {
                cfg.reload_on_change = v;
            }
        }

        cfg
    }

    /// Backing file for a table registered under `name`.
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.csv"))
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("TABULA_DATA_DIR", "/srv/tables"),
            ("TABULA_ARITY_POLICY", "Lenient"),
            ("TABULA_LOCK_FILES", "off"),
        ]
        .into_iter()
        .collect();
        let cfg = EngineConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/tables"));
        assert_eq!(cfg.arity_policy, ArityPolicy::Lenient);
        assert!(!cfg.lock_files);
        assert!(cfg.reload_on_change);
        assert_eq!(
            cfg.table_path("goods"),
            PathBuf::from("/srv/tables/goods.csv")
        );
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let cfg = EngineConfig::from_lookup(|k| match k {
            "TABULA_ARITY_POLICY" => Some("loose".into()),
            "TABULA_RELOAD_ON_CHANGE" => Some("maybe".into()),
            _ => None,
        });
        assert_eq!(cfg.arity_policy, ArityPolicy::Strict);
        assert!(cfg.reload_on_change);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let cfg = EngineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"arity_policy\":\"strict\""));
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.arity_policy, cfg.arity_policy);
    }
}
