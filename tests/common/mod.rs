#![allow(dead_code)]

pub use shotgraph_test_utils::{builders, fake_runner, init_tracing, log_capture};
