// src/transforms/bitrise.rs

//! Stages that turn a screenshot task into a Bitrise scheduling job.
//!
//! 1. [`set_run_config`] wires the Bitrise API token as a secret.
//! 2. [`set_worker_config`] declares the log and per-locale zip artifacts.
//! 3. [`add_bitrise_command`] appends the `bitrise-schedule.py` invocation.

use toml::Value;
use tracing::debug;

use crate::config::{Parameters, TransformSettings};
use crate::errors::Result;
use crate::task::{Task, array_mut, set_default, string_array, table_of};
use crate::transforms::keyed_by::by_level;
use crate::transforms::{TransformConfig, TransformSequence};

/// The three Bitrise stages, in order.
pub fn bitrise_transforms() -> TransformSequence {
    TransformSequence::new()
        .with("set_run_config", set_run_config)
        .with("set_worker_config", set_worker_config)
        .with("add_bitrise_command", add_bitrise_command)
}

/// Default the `run` section and (re)write its secrets.
///
/// Level 3 fetches the real token into the token file; every other level
/// gets a placeholder written to the same path so the job still runs.
pub fn set_run_config(config: &TransformConfig, mut task: Task) -> Result<Task> {
    let settings = &config.settings;
    let run = task.table_mut("run")?;

    set_default(run, "using", Value::String(settings.run_using.clone()));
    set_default(run, "use-caches", Value::Boolean(false));

    let secret = table_of([
        ("name", Value::String(settings.secret_name.clone())),
        ("key", Value::String(settings.secret_key.clone())),
        ("path", Value::String(settings.token_file.clone())),
    ]);
    run.insert(
        "secrets".to_string(),
        by_level(Value::Array(vec![Value::Table(secret)]), Value::Array(vec![])),
    );

    let dummy = table_of([
        ("content", Value::String(settings.dummy_token.clone())),
        ("path", Value::String(settings.token_file.clone())),
    ]);
    run.insert(
        "dummy-secrets".to_string(),
        by_level(Value::Array(vec![]), Value::Array(vec![Value::Table(dummy)])),
    );

    Ok(task)
}

/// Append artifacts and fill worker defaults.
///
/// Artifacts are appended after any the task already declares: the Bitrise
/// log first, then one screenshot zip per locale in `chunk_locales` order.
pub fn set_worker_config(config: &TransformConfig, mut task: Task) -> Result<Task> {
    let settings = &config.settings;
    let dir = artifacts_dir(settings);
    let locales = task.chunk_locales()?;

    let worker = task.table_mut("worker")?;
    let artifacts = array_mut(worker, "artifacts")?;

    artifacts.push(file_artifact(
        "public/logs/bitrise.log".to_string(),
        format!("{dir}/bitrise.log"),
    ));
    for locale in &locales {
        artifacts.push(file_artifact(
            format!("public/screenshots/{locale}.zip"),
            format!("{dir}/{locale}.zip"),
        ));
    }

    set_default(worker, "docker-image", Value::Table(settings.docker_image.clone()));
    set_default(worker, "max-run-time", Value::Integer(settings.max_run_time));

    task.set_default("worker-type", Value::String(settings.worker_type.clone()));

    Ok(task)
}

/// Consume `bitrise-workflow` / `build-derived-data-path` and append the
/// scheduling command to `run.commands`.
pub fn add_bitrise_command(config: &TransformConfig, mut task: Task) -> Result<Task> {
    // `run` must already exist; it is set up by `set_run_config`.
    task.require_table_mut("run")?;

    let workflow = task.take_required_string("bitrise-workflow")?;
    let derived_data_path = task.pop_string("build-derived-data-path")?;
    let locales = task.chunk_locales()?;

    let command = schedule_command(
        &config.settings,
        &config.params,
        &workflow,
        &locales,
        derived_data_path.as_deref(),
    );
    debug!(
        task = task.name().unwrap_or("<unnamed>"),
        command = %command.join(" "),
        "built bitrise schedule command"
    );

    let run = task.require_table_mut("run")?;
    array_mut(run, "commands")?.push(string_array(&command));

    Ok(task)
}

/// Argument vector for `bitrise-schedule.py`.
///
/// `--derived-data-path` is only added for a non-empty path.
pub fn schedule_command(
    settings: &TransformSettings,
    params: &Parameters,
    workflow: &str,
    locales: &[String],
    derived_data_path: Option<&str>,
) -> Vec<String> {
    let mut command: Vec<String> = [
        settings.interpreter.as_str(),
        settings.schedule_script.as_str(),
        "--token-file",
        settings.token_file.as_str(),
        "--branch",
        params.head_ref.as_str(),
        "--commit",
        params.head_rev.as_str(),
        "--workflow",
        workflow,
        "--artifacts-directory",
        settings.artifacts_directory.as_str(),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for locale in locales {
        command.push("--importLocales".to_string());
        command.push(locale.clone());
    }

    if let Some(path) = derived_data_path.filter(|p| !p.is_empty()) {
        command.push("--derived-data-path".to_string());
        command.push(path.to_string());
    }

    command
}

fn artifacts_dir(settings: &TransformSettings) -> &str {
    let trimmed = settings.artifacts_directory.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn file_artifact(name: String, path: String) -> Value {
    Value::Table(table_of([
        ("type", Value::String("file".to_string())),
        ("name", Value::String(name)),
        ("path", Value::String(path)),
    ]))
}
