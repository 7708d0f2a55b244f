// tests/render_output.rs

use std::error::Error;
use std::path::PathBuf;

use shotgraph::cli::OutputFormat;
use shotgraph::config::{RawParameters, load_and_validate};
use shotgraph::errors::ShotgraphError;
use shotgraph::output::render_tasks;
use shotgraph::task::{Task, table_of};
use shotgraph::transforms::{TransformConfig, bitrise_transforms};

type TestResult = Result<(), Box<dyn Error>>;

fn transformed_demo() -> Result<Vec<Task>, Box<dyn Error>> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/screenshots.toml");
    let kind = load_and_validate(path, None, RawParameters::default())?;
    let config = TransformConfig::from(&kind);
    Ok(bitrise_transforms().run(&config, kind.tasks)?)
}

#[test]
fn json_output_has_one_entry_per_task() -> TestResult {
    let tasks = transformed_demo()?;
    let rendered = render_tasks(&tasks, OutputFormat::Json)?;

    let parsed: serde_json::Value = serde_json::from_str(&rendered)?;
    let graph = parsed["task"].as_object().ok_or("missing task map")?;
    assert_eq!(graph.len(), 2);

    let second = &graph["screenshots-2"];
    assert_eq!(second["worker-type"], "bitrise");
    assert_eq!(second["worker"]["max-run-time"], 10800);
    assert_eq!(second["worker"]["artifacts"].as_array().map(Vec::len), Some(4));

    let command = second["run"]["commands"][0]
        .as_array()
        .ok_or("missing command")?;
    assert_eq!(command.last(), Some(&serde_json::json!("/builds/worker/derived-data")));
    assert!(second.get("bitrise-workflow").is_none());
    Ok(())
}

#[test]
fn toml_output_reloads_as_the_same_tasks() -> TestResult {
    let tasks = transformed_demo()?;
    let rendered = render_tasks(&tasks, OutputFormat::Toml)?;

    let reparsed: toml::Table = toml::from_str(&rendered)?;
    let graph = reparsed
        .get("task")
        .and_then(toml::Value::as_table)
        .ok_or("missing task table")?;

    for task in &tasks {
        let name = task.name().ok_or("unnamed task")?;
        assert_eq!(graph.get(name), Some(&toml::Value::Table(task.as_table().clone())));
    }
    Ok(())
}

#[test]
fn unnamed_tasks_are_keyed_by_index() -> TestResult {
    let rendered = render_tasks(&[Task::default()], OutputFormat::Json)?;
    let parsed: serde_json::Value = serde_json::from_str(&rendered)?;
    assert!(parsed["task"]["task-0"].is_object());
    Ok(())
}

fn named(name: &str, v: i64) -> Task {
    Task::new(table_of([
        ("name", toml::Value::String(name.to_string())),
        ("v", toml::Value::Integer(v)),
    ]))
}

#[test]
fn tasks_render_in_input_order() -> TestResult {
    let tasks = vec![named("shot-2", 1), named("shot-10", 2), Task::default()];

    let json = render_tasks(&tasks, OutputFormat::Json)?;
    let positions = ["\"shot-2\": {", "\"shot-10\": {", "\"task-2\": {"]
        .iter()
        .map(|key| json.find(key).ok_or_else(|| format!("{key} missing")))
        .collect::<Result<Vec<_>, _>>()?;
    assert!(positions.is_sorted(), "{json}");

    let rendered = render_tasks(&tasks[..2], OutputFormat::Toml)?;
    let first = rendered.find("[task.shot-2]").ok_or("shot-2 missing")?;
    let second = rendered.find("[task.shot-10]").ok_or("shot-10 missing")?;
    assert!(first < second, "{rendered}");
    Ok(())
}

#[test]
fn duplicate_names_are_an_error_not_an_overwrite() {
    let tasks = vec![named("x", 1), named("x", 2)];

    match render_tasks(&tasks, OutputFormat::Json) {
        Err(ShotgraphError::ConfigError(msg)) => assert!(msg.contains("'x'"), "{msg}"),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(out) => panic!("Expected error, got: {out}"),
    }
}

#[test]
fn index_key_clashing_with_a_real_name_is_an_error() {
    let tasks = vec![named("task-1", 1), Task::default()];

    assert!(matches!(
        render_tasks(&tasks, OutputFormat::Toml),
        Err(ShotgraphError::ConfigError(ref msg)) if msg.contains("task-1")
    ));
}
