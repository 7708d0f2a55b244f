// src/transforms/keyed_by.rs

//! `by-level` keyed values.
//!
//! A keyed value looks like:
//!
//! ```toml
//! [run.secrets.by-level]
//! "3" = [{ name = "...", key = "...", path = "..." }]
//! default = []
//! ```
//!
//! The task-graph engine picks one branch per run based on the trust level.
//! [`resolve_by_level`] performs the same selection so callers can see what
//! a task will receive at a given level.

use toml::{Table, Value};

use crate::errors::{Result, ShotgraphError};
use crate::types::Level;

pub const BY_LEVEL: &str = "by-level";
pub const DEFAULT_KEY: &str = "default";

/// Build `{ by-level = { "3" = <level3>, default = <default> } }`.
pub fn by_level(level3: Value, default: Value) -> Value {
    let mut branches = Table::new();
    branches.insert(Level::Three.as_str().to_string(), level3);
    branches.insert(DEFAULT_KEY.to_string(), default);

    let mut keyed = Table::new();
    keyed.insert(BY_LEVEL.to_string(), Value::Table(branches));
    Value::Table(keyed)
}

/// Select the branch of a `by-level` value for `level`.
///
/// Falls back to `default` when the level has no entry of its own. Values
/// that are not keyed by level are returned unchanged. Nested keyed values
/// are resolved too.
pub fn resolve_by_level(key: &str, value: &Value, level: Level) -> Result<Value> {
    let Some(branches) = keyed_branches(key, value)? else {
        return Ok(value.clone());
    };

    let chosen = branches
        .get(level.as_str())
        .or_else(|| branches.get(DEFAULT_KEY))
        .ok_or_else(|| ShotgraphError::NoMatchingLevel {
            key: key.to_string(),
            level: level.to_string(),
        })?;

    resolve_by_level(key, chosen, level)
}

fn keyed_branches<'a>(key: &str, value: &'a Value) -> Result<Option<&'a Table>> {
    let Some(table) = value.as_table() else {
        return Ok(None);
    };
    if table.len() != 1 {
        return Ok(None);
    }
    match table.get(BY_LEVEL) {
        None => Ok(None),
        Some(inner) => inner
            .as_table()
            .map(Some)
            .ok_or_else(|| ShotgraphError::InvalidType {
                key: format!("{key}.{BY_LEVEL}"),
                expected: "a table",
            }),
    }
}
