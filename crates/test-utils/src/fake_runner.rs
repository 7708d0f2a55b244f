use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use shotgraph::errors::{Result, ShotgraphError};
use shotgraph::simctl::CommandRunner;

/// A fake runner that:
/// - records every argument vector it is asked to run
/// - fails (exit code 1) any invocation whose arguments contain `fail_on`.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    fail_on: Option<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(arg: &str) -> Self {
        Self {
            calls: Arc::default(),
            fail_on: Some(arg.to_string()),
        }
    }

    pub fn recorded(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&mut self, argv: Vec<String>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let calls = Arc::clone(&self.calls);
        let fail_on = self.fail_on.clone();

        Box::pin(async move {
            calls.lock().unwrap().push(argv.clone());

            match fail_on {
                Some(arg) if argv.iter().any(|a| *a == arg) => Err(ShotgraphError::CommandFailed {
                    program: argv.join(" "),
                    code: Some(1),
                }),
                _ => Ok(()),
            }
        })
    }
}
