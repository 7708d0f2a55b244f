// tests/command_stage.rs

mod common;
use crate::common::builders::{TaskBuilder, TransformConfigBuilder};
use crate::common::init_tracing;

use std::error::Error;

use shotgraph::errors::ShotgraphError;
use shotgraph::task::{Task, string_array};
use shotgraph::transforms::bitrise::{add_bitrise_command, schedule_command, set_run_config};
use shotgraph::transforms::TransformConfig;
use toml::{Table, Value};

type TestResult = Result<(), Box<dyn Error>>;

/// Run the two stages the command stage relies on.
fn build(config: &TransformConfig, task: Task) -> shotgraph::errors::Result<Task> {
    let task = set_run_config(config, task)?;
    add_bitrise_command(config, task)
}

fn commands(task: &Task) -> Vec<Vec<String>> {
    task.get_path(&["run", "commands"])
        .and_then(Value::as_array)
        .map(|cmds| {
            cmds.iter()
                .map(|cmd| {
                    cmd.as_array()
                        .map(|args| {
                            args.iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default()
}

fn count(args: &[String], needle: &str) -> usize {
    args.iter().filter(|a| *a == needle).count()
}

#[test]
fn single_locale_without_derived_data() -> TestResult {
    init_tracing();
    let config = TransformConfigBuilder::new()
        .head_ref("main")
        .head_rev("c0ffee")
        .build();
    let task = build(&config, TaskBuilder::screenshots("shots", &["en-US"]).build())?;

    let cmds = commands(&task);
    assert_eq!(cmds.len(), 1);
    let cmd = &cmds[0];

    let expected: Vec<String> = [
        "python3",
        "taskcluster/scripts/bitrise-schedule.py",
        "--token-file",
        ".bitrise_token",
        "--branch",
        "main",
        "--commit",
        "c0ffee",
        "--workflow",
        "L10nScreenshotsTests",
        "--artifacts-directory",
        "/builds/worker/artifacts",
        "--importLocales",
        "en-US",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    assert_eq!(cmd, &expected);
    assert_eq!(count(cmd, "--importLocales"), 1);
    assert_eq!(count(cmd, "--derived-data-path"), 0);

    Ok(())
}

#[test]
fn derived_data_path_is_appended_last() -> TestResult {
    let config = TransformConfigBuilder::new().build();
    let task = build(
        &config,
        TaskBuilder::screenshots("shots", &["en-US", "fr"])
            .derived_data_path("/tmp/dd")
            .build(),
    )?;

    let cmd = &commands(&task)[0];
    let tail: Vec<&str> = cmd[cmd.len() - 2..].iter().map(String::as_str).collect();
    assert_eq!(tail, vec!["--derived-data-path", "/tmp/dd"]);

    let locales: Vec<&str> = cmd
        .windows(2)
        .filter(|w| w[0] == "--importLocales")
        .map(|w| w[1].as_str())
        .collect();
    assert_eq!(locales, vec!["en-US", "fr"]);

    Ok(())
}

#[test]
fn empty_derived_data_path_is_dropped() -> TestResult {
    let config = TransformConfigBuilder::new().build();
    let task = build(
        &config,
        TaskBuilder::screenshots("shots", &["de"])
            .derived_data_path("")
            .build(),
    )?;

    assert_eq!(count(&commands(&task)[0], "--derived-data-path"), 0);
    assert!(task.get("build-derived-data-path").is_none());

    Ok(())
}

#[test]
fn workflow_and_derived_data_path_are_consumed() -> TestResult {
    let config = TransformConfigBuilder::new().build();
    let task = build(
        &config,
        TaskBuilder::screenshots("shots", &["de"])
            .derived_data_path("/tmp/dd")
            .build(),
    )?;

    assert!(task.get("bitrise-workflow").is_none());
    assert!(task.get("build-derived-data-path").is_none());
    Ok(())
}

#[test]
fn existing_commands_are_kept() -> TestResult {
    let mut run = Table::new();
    run.insert(
        "commands".to_string(),
        Value::Array(vec![string_array(&["echo", "setup"])]),
    );

    let config = TransformConfigBuilder::new().build();
    let task = build(
        &config,
        TaskBuilder::screenshots("shots", &["de"])
            .set("run", Value::Table(run))
            .build(),
    )?;

    let cmds = commands(&task);
    assert_eq!(cmds.len(), 2);
    assert_eq!(cmds[0], vec!["echo".to_string(), "setup".to_string()]);
    assert_eq!(cmds[1][0], "python3");
    Ok(())
}

#[test]
fn missing_workflow_is_a_missing_key_error() {
    let config = TransformConfigBuilder::new().build();
    let result = build(&config, TaskBuilder::new("shots").locales(&["de"]).build());

    assert!(matches!(
        result,
        Err(ShotgraphError::MissingKey(ref key)) if key == "bitrise-workflow"
    ));
}

#[test]
fn missing_run_section_is_a_missing_key_error() {
    let config = TransformConfigBuilder::new().build();
    let result = add_bitrise_command(&config, TaskBuilder::screenshots("shots", &["de"]).build());

    assert!(matches!(
        result,
        Err(ShotgraphError::MissingKey(ref key)) if key == "run"
    ));
}

#[test]
fn schedule_command_uses_parameters_and_settings() {
    let config = TransformConfigBuilder::new()
        .head_ref("release/v120")
        .head_rev("deadbeef")
        .artifacts_directory("/out")
        .build();

    let cmd = schedule_command(
        &config.settings,
        &config.params,
        "Screens",
        &[],
        Some("/dd"),
    );

    let pairs: Vec<(&str, &str)> = cmd[2..]
        .chunks(2)
        .map(|c| (c[0].as_str(), c[1].as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("--token-file", ".bitrise_token"),
            ("--branch", "release/v120"),
            ("--commit", "deadbeef"),
            ("--workflow", "Screens"),
            ("--artifacts-directory", "/out"),
            ("--derived-data-path", "/dd"),
        ]
    );
}
