// src/task.rs

//! Task descriptors.
//!
//! A task descriptor is an open-ended mapping of string keys to TOML values.
//! The transform stages only touch a handful of well-known keys, so the
//! descriptor stays untyped and the helpers below give the
//! "set if absent" / "remove and return" idioms the stages are written in.

use serde::{Deserialize, Serialize};
use toml::value::Array;
use toml::{Table, Value};

use crate::errors::{Result, ShotgraphError};

/// One schedulable unit of CI work.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task(Table);

impl Task {
    pub fn new(table: Table) -> Self {
        Self(table)
    }

    /// The task's `name` key, if present and a string.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn as_table(&self) -> &Table {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Walk nested tables, e.g. `["worker", "artifacts"]`.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for key in rest {
            current = current.as_table()?.get(*key)?;
        }
        Some(current)
    }

    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.insert(key.to_string(), value)
    }

    /// Insert `default` under `key` unless the key is already present.
    pub fn set_default(&mut self, key: &str, default: Value) -> &mut Value {
        set_default(&mut self.0, key, default)
    }

    /// Get the sub-table at `key`, creating an empty one if absent.
    pub fn table_mut(&mut self, key: &str) -> Result<&mut Table> {
        table_mut(&mut self.0, key)
    }

    /// Get the existing sub-table at `key`.
    pub fn require_table_mut(&mut self, key: &str) -> Result<&mut Table> {
        self.0
            .get_mut(key)
            .ok_or_else(|| ShotgraphError::MissingKey(key.to_string()))?
            .as_table_mut()
            .ok_or_else(|| invalid_type(key, "a table"))
    }

    /// Remove `key`, returning its string value. Absent keys yield `None`.
    pub fn pop_string(&mut self, key: &str) -> Result<Option<String>> {
        match self.0.remove(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(invalid_type(key, "a string")),
        }
    }

    /// Remove `key`, which must be present and hold a string.
    pub fn take_required_string(&mut self, key: &str) -> Result<String> {
        self.pop_string(key)?
            .ok_or_else(|| ShotgraphError::MissingKey(key.to_string()))
    }

    /// Locales this task produces screenshots for, from
    /// `attributes.chunk_locales`.
    pub fn chunk_locales(&self) -> Result<Vec<String>> {
        const KEY: &str = "attributes.chunk_locales";

        let attributes = self
            .0
            .get("attributes")
            .ok_or_else(|| ShotgraphError::MissingKey(KEY.to_string()))?
            .as_table()
            .ok_or_else(|| invalid_type("attributes", "a table"))?;

        let locales = attributes
            .get("chunk_locales")
            .ok_or_else(|| ShotgraphError::MissingKey(KEY.to_string()))?
            .as_array()
            .ok_or_else(|| invalid_type(KEY, "an array of strings"))?;

        locales
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid_type(KEY, "an array of strings"))
            })
            .collect()
    }
}

impl From<Table> for Task {
    fn from(table: Table) -> Self {
        Self(table)
    }
}

/// Insert `default` under `key` unless the key is already present.
pub fn set_default<'a>(table: &'a mut Table, key: &str, default: Value) -> &'a mut Value {
    table.entry(key).or_insert(default)
}

/// Get the sub-table at `key`, creating an empty one if absent.
pub fn table_mut<'a>(table: &'a mut Table, key: &str) -> Result<&'a mut Table> {
    set_default(table, key, Value::Table(Table::new()))
        .as_table_mut()
        .ok_or_else(|| invalid_type(key, "a table"))
}

/// Get the array at `key`, creating an empty one if absent.
pub fn array_mut<'a>(table: &'a mut Table, key: &str) -> Result<&'a mut Array> {
    set_default(table, key, Value::Array(Array::new()))
        .as_array_mut()
        .ok_or_else(|| invalid_type(key, "an array"))
}

/// Build a table from string-keyed entries.
pub fn table_of<'k>(entries: impl IntoIterator<Item = (&'k str, Value)>) -> Table {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Convert a list of strings into a TOML array.
pub fn string_array<S: AsRef<str>>(items: &[S]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|s| Value::String(s.as_ref().to_string()))
            .collect(),
    )
}

fn invalid_type(key: &str, expected: &'static str) -> ShotgraphError {
    ShotgraphError::InvalidType {
        key: key.to_string(),
        expected,
    }
}
