// src/config/model.rs

use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use crate::task::Task;
use crate::types::Level;

/// Kind file as read from TOML, before validation.
///
/// ```toml
/// [params]
/// head_ref = "main"
/// head_rev = "0123abcd"
/// level = 3
///
/// [config]
/// max_run_time = 7200
///
/// [task.screenshots-1]
/// bitrise-workflow = "L10nScreenshotsTests"
/// attributes = { chunk_locales = ["en-US", "de"] }
/// ```
///
/// Only `[task.<name>]` is mandatory. `[params]` may come from a separate
/// file or the command line instead.
#[derive(Debug, Clone, Deserialize)]
pub struct RawKindFile {
    #[serde(default)]
    pub params: RawParameters,

    #[serde(default)]
    pub config: TransformSettings,

    /// Raw task descriptors keyed by name, in file order.
    #[serde(default)]
    pub task: Table,
}

/// Validated kind file.
#[derive(Debug, Clone)]
pub struct KindFile {
    pub params: Parameters,
    pub settings: TransformSettings,
    /// Task descriptors in file order, each carrying its `name` key.
    pub tasks: Vec<Task>,
}

impl KindFile {
    pub(crate) fn new_unchecked(
        params: Parameters,
        settings: TransformSettings,
        tasks: Vec<Task>,
    ) -> Self {
        Self {
            params,
            settings,
            tasks,
        }
    }
}

/// Pipeline parameters where every field may still be missing.
///
/// Several sources are layered on top of each other with [`merge`]; the
/// result is checked when converting into [`Parameters`].
///
/// [`merge`]: RawParameters::merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawParameters {
    #[serde(default)]
    pub head_ref: Option<String>,
    #[serde(default)]
    pub head_rev: Option<String>,
    #[serde(default)]
    pub level: Option<Level>,
}

impl RawParameters {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: RawParameters) -> RawParameters {
        RawParameters {
            head_ref: other.head_ref.or(self.head_ref),
            head_rev: other.head_rev.or(self.head_rev),
            level: other.level.or(self.level),
        }
    }
}

/// Read-only parameters of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameters {
    /// Branch being built.
    pub head_ref: String,
    /// Commit being built.
    pub head_rev: String,
    pub level: Level,
}

/// `[config]` section: the fixed values the transforms write into tasks.
///
/// Every field defaults to the value the screenshot pipeline uses in
/// production, so the section is normally omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformSettings {
    #[serde(default = "default_artifacts_directory")]
    pub artifacts_directory: String,

    /// Relative path of the token file the schedule script reads.
    #[serde(default = "default_token_file")]
    pub token_file: String,

    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    #[serde(default = "default_schedule_script")]
    pub schedule_script: String,

    #[serde(default = "default_secret_name")]
    pub secret_name: String,

    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Placeholder written to the token file below level 3.
    #[serde(default = "default_dummy_token")]
    pub dummy_token: String,

    #[serde(default = "default_docker_image")]
    pub docker_image: Table,

    /// Seconds.
    #[serde(default = "default_max_run_time")]
    pub max_run_time: i64,

    #[serde(default = "default_worker_type")]
    pub worker_type: String,

    #[serde(default = "default_run_using")]
    pub run_using: String,
}

fn default_artifacts_directory() -> String {
    "/builds/worker/artifacts".to_string()
}

fn default_token_file() -> String {
    ".bitrise_token".to_string()
}

fn default_interpreter() -> String {
    "python3".to_string()
}

fn default_schedule_script() -> String {
    "taskcluster/scripts/bitrise-schedule.py".to_string()
}

fn default_secret_name() -> String {
    "project/mobile/firefox-ios/bitrise".to_string()
}

fn default_secret_key() -> String {
    "api_key".to_string()
}

fn default_dummy_token() -> String {
    "faketoken".to_string()
}

fn default_docker_image() -> Table {
    let mut image = Table::new();
    image.insert("in-tree".to_string(), Value::String("screenshots".to_string()));
    image
}

fn default_max_run_time() -> i64 {
    10800
}

fn default_worker_type() -> String {
    "bitrise".to_string()
}

fn default_run_using() -> String {
    "run-commands".to_string()
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            artifacts_directory: default_artifacts_directory(),
            token_file: default_token_file(),
            interpreter: default_interpreter(),
            schedule_script: default_schedule_script(),
            secret_name: default_secret_name(),
            secret_key: default_secret_key(),
            dummy_token: default_dummy_token(),
            docker_image: default_docker_image(),
            max_run_time: default_max_run_time(),
            worker_type: default_worker_type(),
            run_using: default_run_using(),
        }
    }
}
