#![allow(dead_code)]

use shotgraph::config::{Parameters, TransformSettings};
use shotgraph::task::{Task, string_array};
use shotgraph::transforms::TransformConfig;
use shotgraph::types::Level;
use toml::{Table, Value};

/// Builder for `TransformConfig` with production defaults.
pub struct TransformConfigBuilder {
    params: Parameters,
    settings: TransformSettings,
}

impl TransformConfigBuilder {
    pub fn new() -> Self {
        Self {
            params: Parameters {
                head_ref: "main".to_string(),
                head_rev: "abcdef0123456789".to_string(),
                level: Level::Three,
            },
            settings: TransformSettings::default(),
        }
    }

    pub fn head_ref(mut self, head_ref: &str) -> Self {
        self.params.head_ref = head_ref.to_string();
        self
    }

    pub fn head_rev(mut self, head_rev: &str) -> Self {
        self.params.head_rev = head_rev.to_string();
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.params.level = level;
        self
    }

    pub fn artifacts_directory(mut self, dir: &str) -> Self {
        self.settings.artifacts_directory = dir.to_string();
        self
    }

    pub fn build(self) -> TransformConfig {
        TransformConfig::new(self.params, self.settings)
    }
}

impl Default for TransformConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for screenshot task descriptors.
pub struct TaskBuilder {
    table: Table,
}

impl TaskBuilder {
    pub fn new(name: &str) -> Self {
        let mut table = Table::new();
        table.insert("name".to_string(), Value::String(name.to_string()));
        Self { table }
    }

    /// A task ready for all three stages: workflow and locales set.
    pub fn screenshots(name: &str, locales: &[&str]) -> Self {
        Self::new(name)
            .workflow("L10nScreenshotsTests")
            .locales(locales)
    }

    pub fn locales(mut self, locales: &[&str]) -> Self {
        let mut attributes = Table::new();
        attributes.insert("chunk_locales".to_string(), string_array(locales));
        self.table
            .insert("attributes".to_string(), Value::Table(attributes));
        self
    }

    pub fn workflow(mut self, workflow: &str) -> Self {
        self.table.insert(
            "bitrise-workflow".to_string(),
            Value::String(workflow.to_string()),
        );
        self
    }

    pub fn derived_data_path(mut self, path: &str) -> Self {
        self.table.insert(
            "build-derived-data-path".to_string(),
            Value::String(path.to_string()),
        );
        self
    }

    /// Set an arbitrary top-level key.
    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.table.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Task {
        Task::new(self.table)
    }
}
