//! The body capability set.
//!
//! RULE: The checkpoint layer never looks inside a body. It computes a
//! path and hands it over; the body owns the file format.
//! Writers iterate heterogeneous sets, so they work on `dyn ParticleBody`.

use crate::naming::DEFAULT_STRUCTURED_EXTENSION;
use std::path::Path;

/// The contract every persistable body must fulfill.
pub trait ParticleBody {
    /// Stable name, embedded in per-body file names.
    fn name(&self) -> &str;

    /// Extension (without dot) of recording files.
    fn recording_extension(&self) -> &str;

    fn restart_extension(&self) -> &str {
        DEFAULT_STRUCTURED_EXTENSION
    }

    fn reload_extension(&self) -> &str {
        DEFAULT_STRUCTURED_EXTENSION
    }

    /// Write the recordable state to `path`.
    fn write_for_recording(&self, path: &Path) -> anyhow::Result<()>;

    /// Write the full state needed to resume a run.
    fn write_for_restart(&self, path: &Path) -> anyhow::Result<()>;

    /// Replace the full state with what `write_for_restart` stored at `path`.
    fn read_for_restart(&mut self, path: &Path) -> anyhow::Result<()>;

    /// Write the particle layout only.
    fn write_for_reload(&self, path: &Path) -> anyhow::Result<()>;

    /// Replace the particle layout with the one stored at `path`.
    fn read_for_reload(&mut self, path: &Path) -> anyhow::Result<()>;
}
