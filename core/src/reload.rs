//! Particle-layout reload files.
//!
//! One unindexed file per body, `<reload>/<name>_rld.<ext>`, replaced on
//! every write. `name` defaults to the body's own name but can be
//! overridden, so a layout generated under one label can seed a body
//! with another.

use crate::{
    base_io::{body_error, check_bound, BaseIo},
    body::ParticleBody,
    config::IoEnvironment,
    error::{CheckpointError, CheckpointResult},
    naming::{fixed_path, RELOAD_SUFFIX},
    staging::write_staged,
    types::IterationStep,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct ReloadTarget {
    body: String,
    file: PathBuf,
}

pub struct ReloadParticleIo {
    base:    BaseIo,
    targets: Vec<ReloadTarget>,
}

impl ReloadParticleIo {
    pub fn new(env: IoEnvironment, bodies: &[&dyn ParticleBody]) -> Self {
        let base = BaseIo::new(env);
        let targets = bodies
            .iter()
            .map(|b| ReloadTarget {
                body: b.name().to_string(),
                file: reload_path(&base.env().reload_folder, b.name(), *b),
            })
            .collect();
        Self { base, targets }
    }

    /// Bind a single body to the reload file of `given_name`.
    pub fn with_name(env: IoEnvironment, body: &dyn ParticleBody, given_name: &str) -> Self {
        let base = BaseIo::new(env);
        let file = reload_path(&base.env().reload_folder, given_name, body);
        Self {
            base,
            targets: vec![ReloadTarget { body: body.name().to_string(), file }],
        }
    }

    pub fn single(env: IoEnvironment, body: &dyn ParticleBody) -> Self {
        Self::with_name(env, body, body.name())
    }

    pub fn base(&self) -> &BaseIo {
        &self.base
    }

    pub fn file_paths(&self) -> impl Iterator<Item = &Path> {
        self.targets.iter().map(|t| t.file.as_path())
    }

    /// Replace every body's reload file. `_iteration_step` does not enter
    /// the file name.
    pub fn write_to_file(
        &self,
        bodies: &[&dyn ParticleBody],
        _iteration_step: IterationStep,
    ) -> CheckpointResult<Vec<PathBuf>> {
        self.check(bodies.iter().map(|b| b.name()))?;

        let mut written = Vec::with_capacity(bodies.len());
        for (body, target) in bodies.iter().zip(&self.targets) {
            let committed = write_staged(&target.file, |tmp| {
                body.write_for_reload(tmp)
                    .map_err(|e| body_error(body.name(), &target.file, e))
            })?;
            written.push(committed);
        }
        log::info!("Wrote {} reload files", written.len());
        Ok(written)
    }

    /// Load every body's layout. `_restart_step` does not enter the file
    /// name. No body is touched unless every file is present.
    pub fn read_from_file(
        &self,
        bodies: &mut [&mut dyn ParticleBody],
        _restart_step: IterationStep,
    ) -> CheckpointResult<()> {
        log::info!("Reloading particles from files");
        self.check(bodies.iter().map(|b| b.name()))?;

        if let Some(missing) = self.targets.iter().find(|t| !t.file.is_file()) {
            return Err(CheckpointError::MissingSnapshot { path: missing.file.clone() });
        }

        for (body, target) in bodies.iter_mut().zip(&self.targets) {
            body.read_for_reload(&target.file)
                .map_err(|e| body_error(body.name(), &target.file, e))?;
            log::debug!("Reloaded body '{}' from {}", target.body, target.file.display());
        }
        Ok(())
    }

    fn check<'a>(&self, names: impl ExactSizeIterator<Item = &'a str>) -> CheckpointResult<()> {
        let bound: Vec<String> = self.targets.iter().map(|t| t.body.clone()).collect();
        check_bound(&bound, names)
    }
}

fn reload_path(folder: &Path, name: &str, body: &dyn ParticleBody) -> PathBuf {
    fixed_path(folder, &format!("{name}{RELOAD_SUFFIX}"), body.reload_extension())
}
