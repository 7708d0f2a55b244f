// src/config/validate.rs

use std::collections::HashSet;

use toml::Value;
use tracing::warn;

use crate::config::model::{KindFile, Parameters, RawKindFile, RawParameters, TransformSettings};
use crate::errors::{Result, ShotgraphError};
use crate::task::Task;
use crate::types::Level;

impl TryFrom<RawKindFile> for KindFile {
    type Error = ShotgraphError;

    fn try_from(raw: RawKindFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_tasks(&raw)?;
        validate_settings(&raw.config)?;
        let params = Parameters::try_from(raw.params)?;

        let tasks = raw
            .task
            .into_iter()
            .map(|(name, value)| named_task(name, value))
            .collect::<Result<Vec<_>>>()?;
        ensure_unique_names(&tasks)?;

        Ok(KindFile::new_unchecked(params, raw.config, tasks))
    }
}

impl TryFrom<RawParameters> for Parameters {
    type Error = ShotgraphError;

    fn try_from(raw: RawParameters) -> std::result::Result<Self, Self::Error> {
        let head_ref = required_param(raw.head_ref, "head_ref")?;
        let head_rev = required_param(raw.head_rev, "head_rev")?;

        let level = match raw.level {
            Some(level) => level,
            None => {
                warn!("no level given in parameters; assuming level 1 (no real secrets)");
                Level::default()
            }
        };

        Ok(Parameters {
            head_ref,
            head_rev,
            level,
        })
    }
}

/// Check the whole-file invariants without converting.
pub fn validate_config(cfg: &RawKindFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_settings(&cfg.config)?;
    Parameters::try_from(cfg.params.clone())?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawKindFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(ShotgraphError::ConfigError(
            "kind file must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_settings(settings: &TransformSettings) -> Result<()> {
    if settings.max_run_time <= 0 {
        return Err(ShotgraphError::ConfigError(format!(
            "[config].max_run_time must be > 0 (got {})",
            settings.max_run_time
        )));
    }

    let non_empty = [
        ("artifacts_directory", &settings.artifacts_directory),
        ("token_file", &settings.token_file),
        ("interpreter", &settings.interpreter),
        ("schedule_script", &settings.schedule_script),
        ("worker_type", &settings.worker_type),
    ];
    for (key, value) in non_empty {
        if value.trim().is_empty() {
            return Err(ShotgraphError::ConfigError(format!(
                "[config].{key} must not be empty"
            )));
        }
    }

    Ok(())
}

fn required_param(value: Option<String>, key: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ShotgraphError::ConfigError(format!(
            "parameter '{key}' is required (set it in [params], a params file, or on the command line)"
        ))),
    }
}

fn named_task(name: String, value: Value) -> Result<Task> {
    if name.trim().is_empty() {
        return Err(ShotgraphError::ConfigError(
            "task names must not be empty".to_string(),
        ));
    }

    let Value::Table(table) = value else {
        return Err(ShotgraphError::ConfigError(format!(
            "[task.{name}] must be a table"
        )));
    };

    let mut task = Task::new(table);
    task.set_default("name", Value::String(name));
    Ok(task)
}

/// Each task's effective `name` (explicit, or its section key) must be unique.
fn ensure_unique_names(tasks: &[Task]) -> Result<()> {
    let mut seen = HashSet::new();
    for task in tasks {
        let Some(name) = task.name() else {
            return Err(ShotgraphError::InvalidType {
                key: "name".to_string(),
                expected: "a string",
            });
        };
        if !seen.insert(name) {
            return Err(ShotgraphError::ConfigError(format!(
                "duplicate task name '{name}'"
            )));
        }
    }
    Ok(())
}
