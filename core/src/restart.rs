//! Full-state checkpoints for resuming an interrupted run.
//!
//! A checkpoint set for step `k` is:
//!   - `<restart>/Restart_time_<token>.dat`: the physical time, one line,
//!     fixed-point with 9 fractional digits.
//!   - `<restart>/<body>_rst_<token>.<ext>`: one file per body.
//!
//! COMMIT ORDER: every file of the set is staged first. Body files are then
//! renamed into place in list order and the time file goes last, so the
//! presence of the time file marks a complete set. A failure before the
//! commit phase leaves the previous set at that token untouched.

use crate::{
    base_io::{body_error, check_bound, names_of, BaseIo},
    body::ParticleBody,
    clock::SimClock,
    config::IoEnvironment,
    error::{CheckpointError, CheckpointResult},
    naming::{
        indexed_path, parse_indexed_name, RESTART_BODY_INFIX, RESTART_TIME_EXTENSION,
        RESTART_TIME_PREFIX,
    },
    staging::StagedFile,
    types::{IterationStep, PhysicalTime},
};
use std::path::{Path, PathBuf};

/// The files written for one checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointSet {
    pub step:       IterationStep,
    pub token:      String,
    pub time_file:  PathBuf,
    pub body_files: Vec<PathBuf>,
}

pub struct RestartIo {
    base:   BaseIo,
    bodies: Vec<String>,
}

impl RestartIo {
    pub fn new(env: IoEnvironment, bodies: &[&dyn ParticleBody]) -> Self {
        Self {
            base:   BaseIo::new(env),
            bodies: names_of(bodies),
        }
    }

    pub fn base(&self) -> &BaseIo {
        &self.base
    }

    fn folder(&self) -> &Path {
        &self.base.env().restart_folder
    }

    pub fn time_file_path(&self, step: IterationStep) -> PathBuf {
        indexed_path(
            self.folder(),
            RESTART_TIME_PREFIX,
            &self.base.step_token(step),
            RESTART_TIME_EXTENSION,
        )
    }

    pub fn body_file_path(&self, body: &dyn ParticleBody, step: IterationStep) -> PathBuf {
        indexed_path(
            self.folder(),
            &format!("{}{RESTART_BODY_INFIX}", body.name()),
            &self.base.step_token(step),
            body.restart_extension(),
        )
    }

    /// Write a complete checkpoint set for `iteration_step`.
    pub fn write_to_file(
        &self,
        bodies: &[&dyn ParticleBody],
        physical_time: PhysicalTime,
        iteration_step: IterationStep,
    ) -> CheckpointResult<CheckpointSet> {
        check_bound(&self.bodies, bodies.iter().map(|b| b.name()))?;
        if !physical_time.is_finite() {
            return Err(CheckpointError::InvalidTime { time: physical_time });
        }

        let mut staged_bodies = Vec::with_capacity(bodies.len());
        for body in bodies {
            let staged = StagedFile::new(self.body_file_path(*body, iteration_step));
            body.write_for_restart(staged.temp_path())
                .map_err(|e| body_error(body.name(), staged.final_path(), e))?;
            staged_bodies.push(staged);
        }

        let staged_time = StagedFile::new(self.time_file_path(iteration_step));
        std::fs::write(staged_time.temp_path(), format_restart_time(physical_time))
            .map_err(|e| CheckpointError::io(staged_time.final_path(), e))?;

        let body_files = staged_bodies
            .into_iter()
            .map(StagedFile::commit)
            .collect::<CheckpointResult<Vec<_>>>()?;
        let time_file = staged_time.commit()?;

        log::info!(
            "Checkpoint written at step {iteration_step} (t = {physical_time:.9}, {} bodies)",
            body_files.len()
        );
        Ok(CheckpointSet {
            step: iteration_step,
            token: self.base.step_token(iteration_step),
            time_file,
            body_files,
        })
    }

    /// Read the physical time stored for `restart_step`.
    pub fn read_restart_time(&self, restart_step: IterationStep) -> CheckpointResult<PhysicalTime> {
        log::info!("Reading restart files from restart step {restart_step}");
        let path = self.time_file_path(restart_step);
        if !path.is_file() {
            return Err(CheckpointError::MissingSnapshot { path });
        }
        let content = std::fs::read_to_string(&path).map_err(|e| CheckpointError::io(&path, e))?;
        match content.split_whitespace().next().map(str::parse::<f64>) {
            Some(Ok(time)) => Ok(time),
            _ => Err(CheckpointError::MalformedTimeFile { path, content }),
        }
    }

    /// Restore every body from the set at `restart_step`, in list order.
    /// No body is touched unless every per-body file is present.
    pub fn read_from_file(
        &self,
        bodies: &mut [&mut dyn ParticleBody],
        restart_step: IterationStep,
    ) -> CheckpointResult<()> {
        check_bound(&self.bodies, bodies.iter().map(|b| b.name()))?;

        let paths: Vec<PathBuf> = bodies
            .iter()
            .map(|b| self.body_file_path(&**b, restart_step))
            .collect();
        if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
            return Err(CheckpointError::MissingSnapshot { path: missing.clone() });
        }

        for (body, path) in bodies.iter_mut().zip(&paths) {
            body.read_for_restart(path)
                .map_err(|e| body_error(body.name(), path, e))?;
            log::debug!("Restored body '{}' from {}", body.name(), path.display());
        }
        Ok(())
    }

    /// Read time and bodies for `restart_step` and move the clock there.
    pub fn resume(
        &self,
        bodies: &mut [&mut dyn ParticleBody],
        restart_step: IterationStep,
        clock: &mut SimClock,
    ) -> CheckpointResult<PhysicalTime> {
        let time = self.read_restart_time(restart_step)?;
        self.read_from_file(bodies, restart_step)?;
        clock.restore(restart_step, time);
        Ok(time)
    }

    pub fn checkpoint_exists(&self, step: IterationStep) -> bool {
        self.time_file_path(step).is_file()
    }

    /// Steps with a committed time file, ascending. Only names this
    /// writer would produce count, so every step returned can be resumed.
    pub fn available_steps(&self) -> CheckpointResult<Vec<IterationStep>> {
        let folder = self.folder();
        let entries = std::fs::read_dir(folder).map_err(|e| CheckpointError::io(folder, e))?;
        let mut steps = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CheckpointError::io(folder, e))?;
            let name = entry.file_name();
            let Some(step) = parse_indexed_name(
                &name.to_string_lossy(),
                RESTART_TIME_PREFIX,
                RESTART_TIME_EXTENSION,
            ) else {
                continue;
            };
            let expected = self.time_file_path(step);
            if expected.file_name() != Some(name.as_os_str()) {
                log::warn!(
                    "Ignoring {}: token does not have width {}",
                    entry.path().display(),
                    self.base.naming().width
                );
                continue;
            }
            if expected.is_file() {
                steps.push(step);
            }
        }
        steps.sort_unstable();
        steps.dedup();
        Ok(steps)
    }

    pub fn latest_step(&self) -> CheckpointResult<Option<IterationStep>> {
        Ok(self.available_steps()?.last().copied())
    }
}

/// The exact content of a restart time file.
pub fn format_restart_time(time: PhysicalTime) -> String {
    format!("{time:.9}   \n")
}
