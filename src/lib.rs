// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod output;
pub mod secrets;
pub mod simctl;
pub mod task;
pub mod transforms;
pub mod types;

use std::fs as std_fs;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command, KindArgs, SecretsArgs, SimctlAction, SimctlArgs, TransformArgs};
use crate::config::{KindFile, load_and_validate};
use crate::errors::ShotgraphError;
use crate::fs::RealFileSystem;
use crate::output::render_tasks;
use crate::secrets::{ResolvedSecrets, write_dummy_secrets};
use crate::simctl::{TokioCommandRunner, XcRun};
use crate::task::Task;
use crate::transforms::{TransformConfig, TransformSequence, bitrise_transforms};

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Transform(t) => run_transform(t),
        Command::Secrets(s) => run_secrets(s),
        Command::Simctl(s) => run_simctl(s).await,
    }
}

fn load_kind(args: &KindArgs) -> Result<KindFile> {
    let kind = load_and_validate(&args.kind, args.params.as_deref(), args.overrides())
        .with_context(|| format!("loading kind file {:?}", args.kind))?;
    Ok(kind)
}

/// Push every task of the kind file through the Bitrise stages.
fn transform_kind(kind: &KindFile) -> Result<Vec<Task>> {
    let config = TransformConfig::from(kind);
    let sequence = bitrise_transforms();
    let tasks = sequence.run(&config, kind.tasks.clone())?;
    Ok(tasks)
}

fn run_transform(args: TransformArgs) -> Result<()> {
    let kind = load_kind(&args.kind)?;

    if args.dry_run {
        print_dry_run(&kind, &bitrise_transforms());
        return Ok(());
    }

    let tasks = transform_kind(&kind)?;
    info!(
        tasks = tasks.len(),
        level = %kind.params.level,
        head_ref = %kind.params.head_ref,
        "transformed tasks"
    );

    let rendered = render_tasks(&tasks, args.format)?;
    match args.output {
        Some(path) => {
            std_fs::write(&path, rendered).with_context(|| format!("writing {:?}", path))?;
            info!(path = %path.display(), "wrote task graph");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn run_secrets(args: SecretsArgs) -> Result<()> {
    let kind = load_kind(&args.kind)?;
    let level = kind.params.level;
    let tasks = transform_kind(&kind)?;

    let task = tasks
        .iter()
        .find(|t| t.name() == Some(args.task.as_str()))
        .ok_or_else(|| ShotgraphError::TaskNotFound(args.task.clone()))?;

    let resolved = ResolvedSecrets::for_task(task, level)?;

    for secret in &resolved.secrets {
        info!(
            name = %secret.name,
            key = %secret.key,
            path = %secret.path,
            "real secret is provided by the worker at this level"
        );
    }

    let written = write_dummy_secrets(&RealFileSystem, &args.root, &resolved.dummy_secrets)?;
    for path in &written {
        println!("{}", path.display());
    }

    Ok(())
}

async fn run_simctl(args: SimctlArgs) -> Result<()> {
    let mut xcrun = XcRun::with_binary(args.xcrun, TokioCommandRunner::new());

    match args.action {
        SimctlAction::Shutdown { device } => xcrun.shutdown(&device).await?,
        SimctlAction::Erase { device } => xcrun.erase(&device).await?,
    }

    Ok(())
}

/// Simple dry-run output: parameters, settings, tasks and stages.
fn print_dry_run(kind: &KindFile, sequence: &TransformSequence) {
    println!("shotgraph dry-run");
    println!("  params.head_ref = {}", kind.params.head_ref);
    println!("  params.head_rev = {}", kind.params.head_rev);
    println!("  params.level = {}", kind.params.level);
    println!(
        "  config.artifacts_directory = {}",
        kind.settings.artifacts_directory
    );
    println!("  config.worker_type = {}", kind.settings.worker_type);
    println!("  config.max_run_time = {}", kind.settings.max_run_time);
    println!();

    println!("stages ({}):", sequence.len());
    for name in sequence.stage_names() {
        println!("  - {name}");
    }
    println!();

    println!("tasks ({}):", kind.tasks.len());
    for task in &kind.tasks {
        println!("  - {}", task.name().unwrap_or("<unnamed>"));
        match task.chunk_locales() {
            Ok(locales) => println!("      chunk_locales: {:?}", locales),
            Err(e) => println!("      chunk_locales: <{e}>"),
        }
        if let Some(workflow) = task.get("bitrise-workflow").and_then(|v| v.as_str()) {
            println!("      bitrise-workflow: {workflow}");
        }
        if let Some(path) = task
            .get("build-derived-data-path")
            .and_then(|v| v.as_str())
        {
            println!("      build-derived-data-path: {path}");
        }
    }

    debug!("dry-run complete (no transforms applied)");
}
