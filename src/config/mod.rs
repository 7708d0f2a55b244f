// src/config/mod.rs

//! Kind file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a kind file and optional parameters file from disk (`loader.rs`).
//! - Validate parameters and settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_KIND_FILE, load_and_validate, load_from_path, load_params_from_path};
pub use model::{KindFile, Parameters, RawKindFile, RawParameters, TransformSettings};
pub use validate::validate_config;
