// src/output.rs

//! Serialization of transformed tasks.
//!
//! Both formats share one layout, `{ task = { <name> = <descriptor> } }`,
//! which is also what the kind file's `[task.<name>]` sections look like.

use serde::Serialize;
use toml::{Table, Value};

use crate::cli::OutputFormat;
use crate::errors::{Result, ShotgraphError};
use crate::task::Task;

#[derive(Serialize)]
struct TaskGraphOutput {
    /// Insertion-ordered, so tasks render in input order.
    task: Table,
}

/// Render tasks as TOML or pretty-printed JSON.
///
/// Tasks without a `name` are keyed `task-<index>`. Two tasks that end up
/// under the same key are an error.
pub fn render_tasks(tasks: &[Task], format: OutputFormat) -> Result<String> {
    let mut keyed = Table::new();
    for (i, task) in tasks.iter().enumerate() {
        let key = task
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("task-{i}"));
        if keyed.contains_key(&key) {
            return Err(ShotgraphError::ConfigError(format!(
                "duplicate task name '{key}' in output"
            )));
        }
        keyed.insert(key, Value::Table(task.as_table().clone()));
    }
    let output = TaskGraphOutput { task: keyed };

    let rendered = match format {
        OutputFormat::Toml => toml::to_string_pretty(&output)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&output)?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}
