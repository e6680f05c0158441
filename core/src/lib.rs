//! Checkpoint, recording, and particle-reload I/O for particle bodies.
//!
//! RULE: Nothing in this crate exits the process. Every failure is a
//! `CheckpointError` returned to the driver, which decides what is fatal.

pub mod base_io;
pub mod body;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod naming;
pub mod particles;
pub mod recording;
pub mod reload;
pub mod restart;
pub mod rng;
pub mod staging;
pub mod types;

pub use body::ParticleBody;
pub use config::{CheckpointSchedule, IoEnvironment};
pub use error::{CheckpointError, CheckpointResult};
pub use recording::BodyStatesRecording;
pub use reload::ReloadParticleIo;
pub use restart::{CheckpointSet, RestartIo};
