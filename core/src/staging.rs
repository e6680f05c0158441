//! Crash-safe file replacement.
//!
//! Every file is first written under a hidden sibling name, synced, and
//! renamed into place only once the write succeeded. A crash mid-write leaves the
//! previous file at the final path untouched.
//!
//! The temp name is `.<stem>.tmp.<ext>` in the same directory, so the
//! rename never crosses a filesystem and the extension seen by the
//! writer is the final one.

use crate::error::{CheckpointError, CheckpointResult};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct StagedFile {
    final_path: PathBuf,
    temp_path:  PathBuf,
    committed:  bool,
}

impl StagedFile {
    pub fn new(final_path: impl Into<PathBuf>) -> Self {
        let final_path = final_path.into();
        let temp_path = temp_path_for(&final_path);
        Self { final_path, temp_path, committed: false }
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Atomically replace the final path with the staged content.
    pub fn commit(mut self) -> CheckpointResult<PathBuf> {
        std::fs::File::open(&self.temp_path)
            .and_then(|f| f.sync_all())
            .map_err(|e| CheckpointError::io(&self.temp_path, e))?;
        std::fs::rename(&self.temp_path, &self.final_path)
            .map_err(|e| CheckpointError::io(&self.final_path, e))?;
        self.committed = true;
        log::debug!("Committed {}", self.final_path.display());
        Ok(std::mem::take(&mut self.final_path))
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed && self.temp_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.temp_path) {
                log::warn!("Could not remove staged file {}: {e}", self.temp_path.display());
            }
        }
    }
}

/// Stage `final_path`, run `write` against the temp path, then commit.
pub fn write_staged<F>(final_path: impl Into<PathBuf>, write: F) -> CheckpointResult<PathBuf>
where
    F: FnOnce(&Path) -> CheckpointResult<()>,
{
    let staged = StagedFile::new(final_path);
    write(staged.temp_path())?;
    staged.commit()
}

pub fn temp_path_for(final_path: &Path) -> PathBuf {
    let stem = final_path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match final_path.extension() {
        Some(ext) => format!(".{stem}.tmp.{}", ext.to_string_lossy()),
        None => format!(".{stem}.tmp"),
    };
    final_path.with_file_name(name)
}
