//! JSON rendering of run results, for stdout and for the summary file.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Pretty-printed JSON with a trailing newline.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("serializing to JSON")?;
    json.push('\n');
    Ok(json)
}

/// Writes a value as pretty-printed JSON, replacing any existing file.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    debug!(path = %path.display(), "Writing JSON");
    fs::write(path, to_json(value)?).with_context(|| format!("writing {}", path.display()))
}
