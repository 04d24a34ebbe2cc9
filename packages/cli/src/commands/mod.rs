pub mod apply;
pub mod check;
pub mod init;
pub mod show;

pub use apply::{apply, ApplyArgs};
pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use show::{show, ShowArgs};

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Read a front-matter JSON file
pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Resolve `path` against the working directory
pub(crate) fn resolve(cwd: &str, path: &Path) -> std::path::PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(cwd).join(path)
    }
}
