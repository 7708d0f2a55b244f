// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_KIND_FILE, RawParameters};
use crate::simctl::DEFAULT_BINARY;
use crate::types::{Device, Level};

/// Command-line arguments for `shotgraph`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shotgraph",
    version,
    about = "Build localized-screenshot CI tasks and manage iOS simulators.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SHOTGRAPH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Apply the Bitrise transforms to the tasks of a kind file.
    Transform(TransformArgs),

    /// Write the dummy secrets one task receives at the current level.
    Secrets(SecretsArgs),

    /// Shut down or erase simulators via `xcrun simctl`.
    Simctl(SimctlArgs),
}

/// Where tasks and parameters come from.
#[derive(Debug, Clone, Args)]
pub struct KindArgs {
    /// Kind file (TOML) with `[task.<name>]` sections.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_KIND_FILE)]
    pub kind: PathBuf,

    /// Parameters file (TOML); replaces the kind file's `[params]` values.
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// Branch being built.
    #[arg(long, value_name = "REF")]
    pub head_ref: Option<String>,

    /// Commit being built.
    #[arg(long, value_name = "REV")]
    pub head_rev: Option<String>,

    /// Trust level of this run (1, 2 or 3).
    #[arg(long, value_name = "N")]
    pub level: Option<Level>,
}

impl KindArgs {
    /// Parameters given directly on the command line.
    pub fn overrides(&self) -> RawParameters {
        RawParameters {
            head_ref: self.head_ref.clone(),
            head_rev: self.head_rev.clone(),
            level: self.level,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct TransformArgs {
    #[command(flatten)]
    pub kind: KindArgs,

    #[arg(long, value_enum, default_value = "toml")]
    pub format: OutputFormat,

    /// Write the result here instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Parse + validate, print tasks and stages, but don't transform.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SecretsArgs {
    #[command(flatten)]
    pub kind: KindArgs,

    /// Name of the task whose secrets to materialize.
    #[arg(long, value_name = "NAME")]
    pub task: String,

    /// Directory the token file paths are relative to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct SimctlArgs {
    /// Executable providing the `simctl` subcommand.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_BINARY)]
    pub xcrun: String,

    #[command(subcommand)]
    pub action: SimctlAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SimctlAction {
    /// Shut down a simulator.
    Shutdown {
        /// Device UDID, or `all`.
        #[arg(default_value = "all")]
        device: Device,
    },
    /// Shut down, then erase a simulator.
    Erase {
        /// Device UDID, or `all`.
        #[arg(default_value = "all")]
        device: Device,
    },
}

/// Serialization of transformed tasks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Toml,
    Json,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
