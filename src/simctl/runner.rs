// src/simctl/runner.rs

//! Pluggable process runner.
//!
//! [`XcRun`](super::XcRun) talks to a `CommandRunner` instead of spawning
//! processes itself, so tests can record the argument vectors and decide
//! which invocations fail.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{Result, ShotgraphError};

/// Runs one external command to completion.
pub trait CommandRunner: Send {
    /// Run `argv[0]` with the remaining arguments and wait for it to exit.
    ///
    /// A non-zero exit must be reported as
    /// [`ShotgraphError::CommandFailed`].
    fn run(&mut self, argv: Vec<String>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production runner backed by `tokio::process`.
///
/// The child's stdout and stderr are drained line by line into `debug` logs.
#[derive(Debug, Clone, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for TokioCommandRunner {
    fn run(&mut self, argv: Vec<String>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let (program, args) = argv.split_first().ok_or_else(|| {
                ShotgraphError::ConfigError("cannot run an empty command".to_string())
            })?;

            let mut child = Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()?;

            let stdout = child.stdout.take().map(|out| {
                let program = program.clone();
                tokio::spawn(async move {
                    let mut lines = BufReader::new(out).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        debug!(program = %program, "stdout: {}", line);
                    }
                })
            });
            let stderr = child.stderr.take().map(|err| {
                let program = program.clone();
                tokio::spawn(async move {
                    let mut lines = BufReader::new(err).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        debug!(program = %program, "stderr: {}", line);
                    }
                })
            });

            let status = child.wait().await?;

            // Let the readers flush what the child wrote before it exited.
            for reader in [stdout, stderr].into_iter().flatten() {
                let _ = reader.await;
            }

            info!(
                program = %program,
                exit_code = ?status.code(),
                success = status.success(),
                "process exited"
            );

            if status.success() {
                Ok(())
            } else {
                Err(ShotgraphError::CommandFailed {
                    program: argv.join(" "),
                    code: status.code(),
                })
            }
        })
    }
}
