//! File naming: turns iteration steps and physical times into tokens,
//! and tokens into paths.
//!
//! GRAMMAR: `<folder>/<prefix><token>.<ext>`
//!   - token is the zero-padded index, never truncated.
//!   - physical time is quantized to microseconds before padding, so two
//!     times inside the same microsecond share a token.

use crate::{
    error::{CheckpointError, CheckpointResult},
    types::{IterationStep, PhysicalTime},
};
use std::path::{Path, PathBuf};

pub const DEFAULT_TOKEN_WIDTH: usize = 10;

/// Ticks per unit of physical time used for time tokens.
pub const TIME_QUANTUM_PER_UNIT: f64 = 1.0e6;

pub const RESTART_TIME_PREFIX: &str = "Restart_time_";
pub const RESTART_TIME_EXTENSION: &str = "dat";
pub const RESTART_BODY_INFIX: &str = "_rst_";
pub const RELOAD_SUFFIX: &str = "_rld";
pub const DEFAULT_STRUCTURED_EXTENSION: &str = "xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingScheme {
    pub width: usize,
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self { width: DEFAULT_TOKEN_WIDTH }
    }
}

impl NamingScheme {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Zero-pad `index` to the configured width. Longer values are kept whole.
    pub fn pad(&self, index: u64) -> String {
        format!("{index:0>width$}", width = self.width)
    }

    pub fn step_token(&self, step: IterationStep) -> String {
        self.pad(step)
    }

    pub fn time_token(&self, time: PhysicalTime) -> CheckpointResult<String> {
        Ok(self.pad(time_index(time)?))
    }
}

/// `floor(t * 1e6)`. Negative, non-finite, or out-of-range times have no token.
pub fn time_index(time: PhysicalTime) -> CheckpointResult<u64> {
    let scaled = (time * TIME_QUANTUM_PER_UNIT).floor();
    if !scaled.is_finite() || scaled < 0.0 || scaled >= u64::MAX as f64 {
        return Err(CheckpointError::InvalidTime { time });
    }
    Ok(scaled as u64)
}

pub fn indexed_path(folder: &Path, prefix: &str, token: &str, ext: &str) -> PathBuf {
    folder.join(format!("{prefix}{token}.{ext}"))
}

pub fn fixed_path(folder: &Path, stem: &str, ext: &str) -> PathBuf {
    folder.join(format!("{stem}.{ext}"))
}

/// Inverse of `indexed_path` for a known prefix and extension.
/// Returns None for anything that is not `<prefix><digits>.<ext>`.
pub fn parse_indexed_name(file_name: &str, prefix: &str, ext: &str) -> Option<u64> {
    let digits = file_name
        .strip_prefix(prefix)?
        .strip_suffix(ext)?
        .strip_suffix('.')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
