//! Periodic body-state recording for visualization and analysis.
//!
//! Write-only: every call adds one file per body under a new token and
//! never deletes files of other tokens. Re-using a token replaces it.

use crate::{
    base_io::{body_error, check_bound, names_of, BaseIo},
    body::ParticleBody,
    config::IoEnvironment,
    error::CheckpointResult,
    naming::indexed_path,
    staging::write_staged,
    types::{IterationStep, PhysicalTime},
};
use std::path::PathBuf;

pub struct BodyStatesRecording {
    base:   BaseIo,
    bodies: Vec<String>,
}

impl BodyStatesRecording {
    pub fn new(env: IoEnvironment, bodies: &[&dyn ParticleBody]) -> Self {
        Self {
            base:   BaseIo::new(env),
            bodies: names_of(bodies),
        }
    }

    pub fn single(env: IoEnvironment, body: &dyn ParticleBody) -> Self {
        Self::new(env, &[body])
    }

    pub fn base(&self) -> &BaseIo {
        &self.base
    }

    /// Record every body under the token of the current physical time.
    pub fn write_to_file(
        &self,
        bodies: &[&dyn ParticleBody],
        physical_time: PhysicalTime,
    ) -> CheckpointResult<Vec<PathBuf>> {
        let token = self.base.time_token(physical_time)?;
        self.write_with_token(bodies, &token)
    }

    /// Record every body under the token of `iteration_step`.
    pub fn write_to_file_at(
        &self,
        bodies: &[&dyn ParticleBody],
        iteration_step: IterationStep,
    ) -> CheckpointResult<Vec<PathBuf>> {
        let token = self.base.step_token(iteration_step);
        self.write_with_token(bodies, &token)
    }

    pub fn file_path(&self, body: &dyn ParticleBody, token: &str) -> PathBuf {
        indexed_path(
            &self.base.env().state_recording_folder,
            &format!("{}_", body.name()),
            token,
            body.recording_extension(),
        )
    }

    fn write_with_token(
        &self,
        bodies: &[&dyn ParticleBody],
        token: &str,
    ) -> CheckpointResult<Vec<PathBuf>> {
        check_bound(&self.bodies, bodies.iter().map(|b| b.name()))?;

        let mut written = Vec::with_capacity(bodies.len());
        for body in bodies {
            let path = self.file_path(*body, token);
            let committed = write_staged(&path, |tmp| {
                body.write_for_recording(tmp)
                    .map_err(|e| body_error(body.name(), &path, e))
            })?;
            written.push(committed);
        }
        log::debug!("Recorded {} bodies at token {token}", written.len());
        Ok(written)
    }
}
