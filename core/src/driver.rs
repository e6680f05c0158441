//! The simulation driver: owns the clock, the bodies, and the writers,
//! and decides when to record, checkpoint, and resume.
//!
//! STEP ORDER (fixed):
//!   1. Advance the clock.
//!   2. Run the stepper on every body.
//!   3. Record, if the schedule says so. Failures are logged and skipped.
//!   4. Checkpoint, if the schedule says so. Failures stop the run.
//!
//! Serialization never overlaps a step: the driver is the only caller.

use crate::{
    body::ParticleBody,
    clock::SimClock,
    config::{CheckpointSchedule, IoEnvironment},
    error::{CheckpointError, CheckpointResult},
    recording::BodyStatesRecording,
    reload::ReloadParticleIo,
    restart::{CheckpointSet, RestartIo},
    types::{IterationStep, PhysicalTime},
};

/// The physics step. External to the checkpoint layer.
pub trait Stepper<B> {
    /// Unique stable name, used in error reports.
    fn name(&self) -> &'static str;

    /// Advance every body by `dt`. `clock` already reflects the new step.
    fn step(&mut self, bodies: &mut [B], clock: &SimClock, dt: PhysicalTime) -> anyhow::Result<()>;
}

pub struct SimDriver<B: ParticleBody + 'static> {
    pub clock: SimClock,
    schedule:  CheckpointSchedule,
    bodies:    Vec<B>,
    stepper:   Box<dyn Stepper<B>>,
    recording: BodyStatesRecording,
    restart:   RestartIo,
}

impl<B: ParticleBody + 'static> SimDriver<B> {
    pub fn new(
        env: IoEnvironment,
        schedule: CheckpointSchedule,
        bodies: Vec<B>,
        stepper: Box<dyn Stepper<B>>,
    ) -> CheckpointResult<Self> {
        env.validate()?;
        let (recording, restart) = {
            let views: Vec<&dyn ParticleBody> = bodies.iter().map(|b| b as &dyn ParticleBody).collect();
            (
                BodyStatesRecording::new(env.clone(), &views),
                RestartIo::new(env, &views),
            )
        };
        Ok(Self {
            clock: SimClock::new(),
            schedule,
            bodies,
            stepper,
            recording,
            restart,
        })
    }

    pub fn bodies(&self) -> &[B] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [B] {
        &mut self.bodies
    }

    pub fn restart_io(&self) -> &RestartIo {
        &self.restart
    }

    /// Advance one step. Returns the new iteration number. A negative or
    /// non-finite `dt` is rejected and leaves the clock where it was.
    pub fn step(&mut self, dt: PhysicalTime) -> CheckpointResult<IterationStep> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(CheckpointError::InvalidTime { time: dt });
        }
        let step = self.clock.advance(dt);
        self.stepper
            .step(&mut self.bodies, &self.clock, dt)
            .map_err(|source| CheckpointError::Step {
                stepper: self.stepper.name().to_string(),
                step,
                source,
            })?;

        if self.schedule.records_at(step) {
            if let Err(e) = self.record() {
                log::warn!("Skipping recording at step {step}: {e}");
            }
        }
        if self.schedule.restarts_at(step) {
            self.checkpoint_now()?;
        }
        Ok(step)
    }

    /// Run `n` steps of size `dt`.
    pub fn run_steps(&mut self, n: u64, dt: PhysicalTime) -> CheckpointResult<()> {
        for _ in 0..n {
            self.step(dt)?;
        }
        log::info!(
            "Ran {n} steps, now at step {} (t = {:.9})",
            self.clock.iteration,
            self.clock.physical_time
        );
        Ok(())
    }

    /// Record every body under the current physical-time token.
    pub fn record(&self) -> CheckpointResult<()> {
        let views = self.views();
        self.recording.write_to_file(&views, self.clock.physical_time)?;
        Ok(())
    }

    /// Write a checkpoint for the current step.
    pub fn checkpoint_now(&self) -> CheckpointResult<CheckpointSet> {
        let views = self.views();
        self.restart
            .write_to_file(&views, self.clock.physical_time, self.clock.iteration)
    }

    /// Restore bodies and clock from the checkpoint at `step`.
    pub fn resume_from(&mut self, step: IterationStep) -> CheckpointResult<PhysicalTime> {
        let mut views: Vec<&mut dyn ParticleBody> = self
            .bodies
            .iter_mut()
            .map(|b| b as &mut dyn ParticleBody)
            .collect();
        self.restart.resume(&mut views, step, &mut self.clock)
    }

    /// Resume from the newest committed checkpoint, if any.
    pub fn resume_latest(&mut self) -> CheckpointResult<Option<IterationStep>> {
        match self.restart.latest_step()? {
            Some(step) => {
                self.resume_from(step)?;
                Ok(Some(step))
            }
            None => Ok(None),
        }
    }

    /// Store the current body layouts for later runs.
    pub fn write_reload(&self, reload: &ReloadParticleIo) -> CheckpointResult<()> {
        let views = self.views();
        reload.write_to_file(&views, self.clock.iteration)?;
        Ok(())
    }

    /// Replace body layouts with the ones stored for `reload`.
    pub fn apply_reload(&mut self, reload: &ReloadParticleIo) -> CheckpointResult<()> {
        let mut views: Vec<&mut dyn ParticleBody> = self
            .bodies
            .iter_mut()
            .map(|b| b as &mut dyn ParticleBody)
            .collect();
        reload.read_from_file(&mut views, self.clock.iteration)
    }

    fn views(&self) -> Vec<&dyn ParticleBody> {
        self.bodies.iter().map(|b| b as &dyn ParticleBody).collect()
    }
}
