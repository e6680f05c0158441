use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("Snapshot file not found: {}", path.display())]
    MissingSnapshot { path: PathBuf },

    #[error("Configured folder does not exist: {}", path.display())]
    MissingFolder { path: PathBuf },

    #[error("Invalid I/O configuration: {0}")]
    InvalidConfig(String),

    #[error("Physical time {time} cannot be turned into a file token")]
    InvalidTime { time: f64 },

    #[error("Restart time file {} is malformed: {content:?}", path.display())]
    MalformedTimeFile { path: PathBuf, content: String },

    #[error("Body set mismatch: expected {expected} bodies, got {actual}")]
    BodyCountMismatch { expected: usize, actual: usize },

    #[error("Body set mismatch: expected body '{expected}', got '{actual}'")]
    BodyNameMismatch { expected: String, actual: String },

    #[error("Body '{name}' appears more than once in the body set")]
    DuplicateBody { name: String },

    #[error("Body '{body}' failed on {}: {source}", path.display())]
    Body {
        body: String,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Stepper '{stepper}' failed at step {step}: {source}")]
    Step {
        stepper: String,
        step:    u64,
        #[source]
        source:  anyhow::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CheckpointError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// True when the failure means "nothing was ever written here",
    /// as opposed to a write or parse that went wrong.
    pub fn is_missing_snapshot(&self) -> bool {
        matches!(self, Self::MissingSnapshot { .. })
    }
}

pub type CheckpointResult<T> = Result<T, CheckpointError>;
