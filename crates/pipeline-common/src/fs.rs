//! Filesystem helpers for atomic artifact writes.
//!
//! Pipeline artifacts are handed between stages by filename, so a crash
//! mid-write must never leave a half-written file under the final name.
//! Writers target a `.partial` sibling and rename into place on success.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineResult;

/// The temporary sibling path used while writing `path`.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write `bytes` to `path` atomically: write a `.partial` sibling, then rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> PipelineResult<()> {
    let tmp = partial_path(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Rename a previously written `.partial` sibling into its final place.
pub fn promote_partial(path: &Path) -> PipelineResult<()> {
    fs::rename(partial_path(path), path)?;
    Ok(())
}
