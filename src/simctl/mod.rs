// src/simctl/mod.rs

//! Thin wrapper around `xcrun simctl`.
//!
//! - [`runner`] provides the `CommandRunner` seam and the real
//!   `tokio::process` implementation.

pub mod runner;

use tracing::info;

use crate::errors::Result;
use crate::types::Device;

pub use runner::{CommandRunner, TokioCommandRunner};

pub const DEFAULT_BINARY: &str = "xcrun";

/// Issues `simctl` subcommands through a [`CommandRunner`].
///
/// Failures are returned as-is; nothing is retried.
#[derive(Debug)]
pub struct XcRun<R: CommandRunner> {
    binary: String,
    runner: R,
}

impl<R: CommandRunner> XcRun<R> {
    pub fn new(runner: R) -> Self {
        Self::with_binary(DEFAULT_BINARY, runner)
    }

    pub fn with_binary(binary: impl Into<String>, runner: R) -> Self {
        Self {
            binary: binary.into(),
            runner,
        }
    }

    /// `<binary> simctl shutdown <device>`
    pub async fn shutdown(&mut self, device: &Device) -> Result<()> {
        self.simctl(&["shutdown", &device.to_string()]).await
    }

    /// Shut `device` down, then `<binary> simctl erase <device>`.
    ///
    /// The erase is not attempted if the shutdown fails.
    pub async fn erase(&mut self, device: &Device) -> Result<()> {
        self.shutdown(device).await?;
        self.simctl(&["erase", &device.to_string()]).await
    }

    async fn simctl(&mut self, args: &[&str]) -> Result<()> {
        let mut argv = Vec::with_capacity(args.len() + 2);
        argv.push(self.binary.clone());
        argv.push("simctl".to_string());
        argv.extend(args.iter().map(|a| a.to_string()));

        info!("Running: {}", argv.join(" "));
        self.runner.run(argv).await
    }
}
