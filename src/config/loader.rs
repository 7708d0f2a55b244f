// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{KindFile, RawKindFile, RawParameters};
use crate::errors::Result;

/// Kind file used when none is given on the command line.
pub const DEFAULT_KIND_FILE: &str = "screenshots.toml";

/// Load a kind file and return the raw, unvalidated `RawKindFile`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawKindFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let kind: RawKindFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), tasks = kind.task.len(), "loaded kind file");

    Ok(kind)
}

/// Load a standalone parameters file (top-level `head_ref`, `head_rev`,
/// `level`).
pub fn load_params_from_path(path: impl AsRef<Path>) -> Result<RawParameters> {
    let contents = fs::read_to_string(path.as_ref())?;
    let params: RawParameters = toml::from_str(&contents)?;
    Ok(params)
}

/// Load a kind file, layer parameters and validate.
///
/// Parameter precedence, lowest first:
/// - the kind file's own `[params]`
/// - the `params_file`, if given
/// - `overrides` (typically command-line flags)
pub fn load_and_validate(
    path: impl AsRef<Path>,
    params_file: Option<&Path>,
    overrides: RawParameters,
) -> Result<KindFile> {
    let mut raw = load_from_path(&path)?;

    if let Some(params_path) = params_file {
        let from_file = load_params_from_path(params_path)?;
        raw.params = raw.params.merge(from_file);
    }
    raw.params = raw.params.merge(overrides);

    KindFile::try_from(raw)
}
