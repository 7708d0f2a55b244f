// tests/transform_sequence.rs

mod common;
use crate::common::builders::{TaskBuilder, TransformConfigBuilder};
use crate::common::init_tracing;

use std::error::Error;

use shotgraph::errors::{Result as ShotResult, ShotgraphError};
use shotgraph::secrets::ResolvedSecrets;
use shotgraph::task::Task;
use shotgraph::transforms::{TransformConfig, TransformSequence, bitrise_transforms};
use shotgraph::types::Level;
use toml::Value;

type TestResult = Result<(), Box<dyn Error>>;

fn tag(_config: &TransformConfig, mut task: Task) -> ShotResult<Task> {
    let seen = task
        .get("seen")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    task.insert("seen", Value::String(format!("{seen}a")));
    Ok(task)
}

fn tag_again(_config: &TransformConfig, mut task: Task) -> ShotResult<Task> {
    let seen = task
        .get("seen")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    task.insert("seen", Value::String(format!("{seen}b")));
    Ok(task)
}

fn reject_b(_config: &TransformConfig, task: Task) -> ShotResult<Task> {
    if task.name() == Some("b") {
        return Err(ShotgraphError::MissingKey("boom".to_string()));
    }
    Ok(task)
}

#[test]
fn stages_run_in_order_for_every_task() -> TestResult {
    init_tracing();
    let config = TransformConfigBuilder::new().build();
    let sequence = TransformSequence::new()
        .with("tag", tag)
        .with("tag_again", tag_again);

    let tasks = vec![TaskBuilder::new("x").build(), TaskBuilder::new("y").build()];
    let out = sequence.run(&config, tasks)?;

    let names: Vec<&str> = out.iter().filter_map(Task::name).collect();
    assert_eq!(names, vec!["x", "y"]);
    for task in &out {
        assert_eq!(task.get("seen").and_then(Value::as_str), Some("ab"));
    }
    Ok(())
}

#[test]
fn apply_is_lazy_and_stops_at_first_failure() {
    let config = TransformConfigBuilder::new().build();
    let sequence = TransformSequence::new().with("reject_b", reject_b);

    let tasks = vec![
        TaskBuilder::new("a").build(),
        TaskBuilder::new("b").build(),
        TaskBuilder::new("c").build(),
    ];

    let mut iter = sequence.apply(&config, tasks);
    assert!(matches!(iter.next(), Some(Ok(ref t)) if t.name() == Some("a")));
    assert!(matches!(iter.next(), Some(Err(ShotgraphError::MissingKey(_)))));
    assert!(matches!(iter.next(), Some(Ok(ref t)) if t.name() == Some("c")));
    assert!(iter.next().is_none());

    let sequence = TransformSequence::new().with("reject_b", reject_b);
    let collected = sequence.run(
        &config,
        vec![TaskBuilder::new("a").build(), TaskBuilder::new("b").build()],
    );
    assert!(collected.is_err());
}

#[test]
fn bitrise_sequence_has_three_stages_in_order() {
    let sequence = bitrise_transforms();
    let names: Vec<&str> = sequence.stage_names().collect();
    assert_eq!(
        names,
        vec!["set_run_config", "set_worker_config", "add_bitrise_command"]
    );
}

#[test]
fn full_pipeline_preserves_count_and_order() -> TestResult {
    let config = TransformConfigBuilder::new().level(Level::Two).build();
    let tasks = vec![
        TaskBuilder::screenshots("shots-2", &["de", "fr"]).build(),
        TaskBuilder::screenshots("shots-1", &["en-US"])
            .derived_data_path("/tmp/dd")
            .build(),
    ];

    let out = bitrise_transforms().run(&config, tasks)?;
    let names: Vec<&str> = out.iter().filter_map(Task::name).collect();
    assert_eq!(names, vec!["shots-2", "shots-1"]);

    for task in &out {
        assert!(task.get_path(&["run", "commands"]).is_some());
        assert!(task.get_path(&["worker", "artifacts"]).is_some());
        assert_eq!(
            task.get("worker-type").and_then(Value::as_str),
            Some("bitrise")
        );

        let resolved = ResolvedSecrets::for_task(task, config.params.level)?;
        assert!(resolved.secrets.is_empty());
        assert_eq!(resolved.dummy_secrets.len(), 1);
    }
    Ok(())
}

#[test]
fn pipeline_aborts_when_a_task_lacks_locales() {
    let config = TransformConfigBuilder::new().build();
    let tasks = vec![
        TaskBuilder::screenshots("good", &["de"]).build(),
        TaskBuilder::new("bad").workflow("Screens").build(),
    ];

    let result = bitrise_transforms().run(&config, tasks);
    assert!(matches!(
        result,
        Err(ShotgraphError::MissingKey(ref key)) if key == "attributes.chunk_locales"
    ));
}
