// src/transforms/mod.rs

//! Task transforms.
//!
//! A transform stage takes the run's [`TransformConfig`] and one task and
//! returns the task, modified. A [`TransformSequence`] chains stages: every
//! task goes through every stage in order, tasks never see each other, and
//! the output keeps the input's length and order.
//!
//! - [`bitrise`] holds the screenshot pipeline's stages.
//! - [`keyed_by`] resolves `by-level` values the stages emit.

pub mod bitrise;
pub mod keyed_by;

use tracing::{error, trace};

use crate::config::{KindFile, Parameters, TransformSettings};
use crate::errors::Result;
use crate::task::Task;

pub use bitrise::bitrise_transforms;
pub use keyed_by::resolve_by_level;

/// Read-only context shared by every stage of one run.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    pub params: Parameters,
    pub settings: TransformSettings,
}

impl TransformConfig {
    pub fn new(params: Parameters, settings: TransformSettings) -> Self {
        Self { params, settings }
    }
}

impl From<&KindFile> for TransformConfig {
    fn from(kind: &KindFile) -> Self {
        Self::new(kind.params.clone(), kind.settings.clone())
    }
}

/// A single stage.
pub type Transform = fn(&TransformConfig, Task) -> Result<Task>;

/// Ordered list of named stages.
#[derive(Debug, Clone, Default)]
pub struct TransformSequence {
    stages: Vec<(&'static str, Transform)>,
}

impl TransformSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn add(&mut self, name: &'static str, stage: Transform) -> &mut Self {
        self.stages.push((name, stage));
        self
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, name: &'static str, stage: Transform) -> Self {
        self.add(name, stage);
        self
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Lazily push each task through all stages.
    ///
    /// Nothing runs until the iterator is polled. Collecting into
    /// `Result<Vec<_>>` stops at the first failing task.
    pub fn apply<'a, I>(
        &'a self,
        config: &'a TransformConfig,
        tasks: I,
    ) -> impl Iterator<Item = Result<Task>> + 'a
    where
        I: IntoIterator<Item = Task>,
        I::IntoIter: 'a,
    {
        tasks
            .into_iter()
            .map(move |task| self.apply_one(config, task))
    }

    /// Transform every task, aborting on the first error.
    pub fn run(&self, config: &TransformConfig, tasks: Vec<Task>) -> Result<Vec<Task>> {
        self.apply(config, tasks).collect()
    }

    fn apply_one(&self, config: &TransformConfig, task: Task) -> Result<Task> {
        let task_name = task.name().unwrap_or("<unnamed>").to_string();

        self.stages.iter().try_fold(task, |task, (stage_name, stage)| {
            trace!(task = %task_name, stage = stage_name, "applying transform");
            stage(config, task).inspect_err(|err| {
                error!(
                    task = %task_name,
                    stage = stage_name,
                    error = %err,
                    "transform failed"
                );
            })
        })
    }
}
