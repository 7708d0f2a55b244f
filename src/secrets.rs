// src/secrets.rs

//! Secrets as seen by a task at a given trust level.
//!
//! `set_run_config` leaves `run.secrets` and `run.dummy-secrets` keyed by
//! level. This module resolves them for one level and writes the dummy
//! token file(s) so a lower-trust run finds the file it expects.

use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{Result, ShotgraphError};
use crate::fs::FileSystem;
use crate::task::Task;
use crate::transforms::keyed_by::resolve_by_level;
use crate::types::Level;

/// A real secret the worker fetches from the secret store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretSpec {
    pub name: String,
    pub key: String,
    pub path: String,
}

/// A placeholder written verbatim in place of a real secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DummySecret {
    pub content: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedSecrets {
    pub secrets: Vec<SecretSpec>,
    pub dummy_secrets: Vec<DummySecret>,
}

impl ResolvedSecrets {
    /// Resolve a transformed task's secrets for `level`.
    ///
    /// A task without `run.secrets` / `run.dummy-secrets` resolves to empty
    /// lists.
    pub fn for_task(task: &Task, level: Level) -> Result<Self> {
        Ok(Self {
            secrets: resolve_list(task, "secrets", level)?,
            dummy_secrets: resolve_list(task, "dummy-secrets", level)?,
        })
    }
}

fn resolve_list<T: DeserializeOwned>(task: &Task, key: &str, level: Level) -> Result<Vec<T>> {
    let Some(value) = task.get_path(&["run", key]) else {
        return Ok(Vec::new());
    };
    let resolved = resolve_by_level(&format!("run.{key}"), value, level)?;
    Ok(resolved.try_into()?)
}

/// Write each dummy secret's content to `root/<path>`.
///
/// Paths must be relative and stay inside `root`. Returns the written paths
/// in input order.
pub fn write_dummy_secrets(
    fs: &dyn FileSystem,
    root: &Path,
    dummies: &[DummySecret],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(dummies.len());

    for dummy in dummies {
        let relative = Path::new(&dummy.path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if dummy.path.is_empty() || escapes {
            return Err(ShotgraphError::ConfigError(format!(
                "dummy secret path must be relative and inside the target directory: {:?}",
                dummy.path
            )));
        }

        let target = root.join(relative);
        fs.write(&target, dummy.content.as_bytes())?;
        info!(path = %target.display(), "wrote dummy secret");
        written.push(target);
    }

    Ok(written)
}
