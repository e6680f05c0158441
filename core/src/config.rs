//! I/O environment and output schedule.
//!
//! RULE: The environment is built once at startup and never mutated.
//! Every writer/reader clones it at construction; nothing looks folders
//! up from ambient state afterwards.

use crate::{
    error::{CheckpointError, CheckpointResult},
    naming::{NamingScheme, DEFAULT_TOKEN_WIDTH},
    types::IterationStep,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_token_width() -> usize {
    DEFAULT_TOKEN_WIDTH
}

/// Resolved folder locations for every kind of output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IoEnvironment {
    pub state_recording_folder: PathBuf,
    pub restart_folder: PathBuf,
    pub reload_folder: PathBuf,
    #[serde(default = "default_token_width")]
    pub token_width: usize,
}

impl IoEnvironment {
    /// Conventional layout under `root`: `output/`, `restart/`, `reload/`.
    /// Does not touch the filesystem.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            state_recording_folder: root.join("output"),
            restart_folder: root.join("restart"),
            reload_folder: root.join("reload"),
            token_width: DEFAULT_TOKEN_WIDTH,
        }
    }

    pub fn with_token_width(mut self, width: usize) -> Self {
        self.token_width = width;
        self
    }

    /// Create the conventional folders under `root` and return the layout.
    /// Host-side setup only; writers never create directories.
    pub fn prepare(root: impl AsRef<Path>) -> CheckpointResult<Self> {
        let env = Self::under(root);
        for folder in env.folders() {
            std::fs::create_dir_all(folder).map_err(|e| CheckpointError::io(folder, e))?;
        }
        Ok(env)
    }

    /// Load from a JSON file and validate.
    pub fn load(path: impl AsRef<Path>) -> CheckpointResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CheckpointError::io(path, e))?;
        let env: IoEnvironment = serde_json::from_str(&content)?;
        env.validate()?;
        log::debug!("Loaded I/O environment from {}", path.display());
        Ok(env)
    }

    pub fn validate(&self) -> CheckpointResult<()> {
        if self.token_width == 0 {
            return Err(CheckpointError::InvalidConfig(
                "token_width must be at least 1".to_string(),
            ));
        }
        for folder in self.folders() {
            if !folder.is_dir() {
                return Err(CheckpointError::MissingFolder { path: folder.to_path_buf() });
            }
        }
        Ok(())
    }

    pub fn naming(&self) -> NamingScheme {
        NamingScheme::new(self.token_width)
    }

    fn folders(&self) -> [&Path; 3] {
        [
            self.state_recording_folder.as_path(),
            self.restart_folder.as_path(),
            self.reload_folder.as_path(),
        ]
    }
}

/// How often the driver records and checkpoints. Zero disables an output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CheckpointSchedule {
    pub recording_interval: IterationStep,
    pub restart_interval: IterationStep,
}

impl Default for CheckpointSchedule {
    fn default() -> Self {
        Self {
            recording_interval: 10,
            restart_interval: 100,
        }
    }
}

impl CheckpointSchedule {
    /// Load from a JSON file. Missing fields take the default intervals.
    pub fn load(path: impl AsRef<Path>) -> CheckpointResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CheckpointError::io(path, e))?;
        let schedule: CheckpointSchedule = serde_json::from_str(&content)?;
        log::debug!("Loaded output schedule from {}: {schedule:?}", path.display());
        Ok(schedule)
    }

    pub fn records_at(&self, step: IterationStep) -> bool {
        self.recording_interval != 0 && step.is_multiple_of(self.recording_interval)
    }

    pub fn restarts_at(&self, step: IterationStep) -> bool {
        self.restart_interval != 0 && step.is_multiple_of(self.restart_interval)
    }
}
